// Copyright © 2025 mailgate
// Licensed under the MIT License

pub mod shutdown;

#[macro_export]
macro_rules! mailgate_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::MailGateError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}
