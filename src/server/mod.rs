pub mod config;
mod dj_routes;
pub mod error;
mod http_layers;
mod manager_routes;
mod producer_routes;
pub mod server;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{load_manager_template, make_app, run_server};
