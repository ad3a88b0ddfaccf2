use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::utils::loose;

const PROVISIONAL_PREFIX: &str = "local-";

/// Server-assigned record identity, kept opaque
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, From)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Id for a record the server has not named yet
    pub fn provisional() -> Self {
        RecordId(format!("{}{}", PROVISIONAL_PREFIX, Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        loose::id(d)
    }
}
