use thiserror::Error;

/// Errors from parsing behavior options given as strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown drag axis '{0}': expected x, y, both or neither")]
    UnknownAxis(String),

    #[error("Unknown event family '{0}': expected pointer or mouse")]
    UnknownEventFamily(String),
}
