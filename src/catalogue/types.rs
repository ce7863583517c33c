use serde::{Deserialize, Serialize};

/// One rubric row: an observable behaviour at a dimension, process and level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: i64,
    pub discipline: String,
    pub dimension: String,
    pub process_verb: String,
    pub level: String,
    pub text: String,
}

impl Descriptor {
    /// Canonical string form of the id, used when matching ids echoed back by
    /// the remote model.
    pub fn id_key(&self) -> String {
        self.id.to_string()
    }
}
