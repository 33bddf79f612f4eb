use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid investment id {value:?}: ids are positive integers assigned by the store")]
pub struct IdError {
    value: String,
}

/// Identifier of a stored investment row.
///
/// Assigned by the record store on insert and never changed afterwards. The hosted
/// table uses a numeric primary key, but clients sometimes send it as a string, so
/// both forms are accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InvestmentId(i64);

impl InvestmentId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse an id from user input, rejecting anything that is not a positive integer.
    pub fn parse(value: &str) -> Result<Self, IdError> {
        match value.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(IdError {
                value: value.to_string(),
            }),
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for InvestmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for InvestmentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for InvestmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(id) => Ok(Self(id)),
            RawId::Text(text) => Self::parse(&text).map_err(de::Error::custom),
        }
    }
}
