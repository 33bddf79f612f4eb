use serde::{Deserialize, Serialize};

/// A cash or savings account listed next to the investment portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub name: String,
    pub balance: f64,
    /// Annual interest, in percent.
    #[serde(default)]
    pub interest_rate: f64,
    /// Free-text note. Accounts with a note are left out of the projected result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BankAccount {
    pub fn new(name: impl Into<String>, balance: f64, interest_rate: f64) -> Self {
        Self {
            name: name.into(),
            balance,
            interest_rate,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}
