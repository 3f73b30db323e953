use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowSlot {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub dj_name: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub display_order: i64,
    /// Always exactly one entry.
    pub slots: Vec<ShowSlot>,
}

impl Show {
    pub fn new(slug: &str, title: &str, description: &str, genre: &str, display_order: i64) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            genre: genre.to_string(),
            display_order,
            slots: vec![ShowSlot::default()],
        }
    }

    pub fn slot(&self) -> Option<&ShowSlot> {
        self.slots.first()
    }

    /// Overwrites the show's slot in place rather than appending.
    pub fn assign_slot(&mut self, slot: ShowSlot) {
        self.slots.clear();
        self.slots.push(slot);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}
