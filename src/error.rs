//! Error taxonomy for configuration tokens, options and card files.
//!
//! The scroll math itself never fails; everything here is about input that
//! arrives from the user (config file, CLI, card files).

pub type StackResult<T> = Result<T, StackError>;

#[derive(thiserror::Error, Debug)]
pub enum StackError {
    #[error("invalid {kind} token: {value:?}")]
    InvalidToken { kind: &'static str, value: String },

    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("card file line {line}: {reason}")]
    CardFile { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StackError {
    pub fn token(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidToken {
            kind,
            value: value.into(),
        }
    }

    pub fn option(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            reason: reason.into(),
        }
    }

    pub fn card_file(line: usize, reason: impl Into<String>) -> Self {
        Self::CardFile {
            line,
            reason: reason.into(),
        }
    }
}
