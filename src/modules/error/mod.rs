// Copyright © 2025 mailgate
// Licensed under the MIT License

use snafu::{Location, Snafu};

pub mod code;
pub mod handler;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailGateError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: code::ErrorCode,
    },
    /// A failure reported by the messaging backend itself. `code` carries the
    /// backend's own error code string, when it supplied one.
    #[snafu(display("{message}"))]
    Backend {
        message: String,
        code: Option<String>,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type MailGateResult<T, E = MailGateError> = std::result::Result<T, E>;

impl MailGateError {
    /// The backend-supplied error code, if this error came from the backend.
    pub fn backend_code(&self) -> Option<String> {
        match self {
            MailGateError::Backend { code, .. } => code.clone(),
            MailGateError::Generic { .. } => None,
        }
    }
}
