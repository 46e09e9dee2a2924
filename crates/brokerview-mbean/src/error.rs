use thiserror::Error;

/// Errors produced while interpreting object names.
///
/// Malformed names are per-item conditions: batch consumers log and skip
/// them rather than aborting the remaining items.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MbeanError {
    #[error("malformed object name '{name}': {reason}")]
    Malformed { name: String, reason: String },
}

impl MbeanError {
    pub fn malformed(name: &str, reason: impl Into<String>) -> Self {
        MbeanError::Malformed {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
