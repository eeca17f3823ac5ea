use thiserror::Error;

/// Errors raised while assembling the runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is out of range or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host capability was not injected.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a [`Error::CapabilityMissing`] with a setter hint.
    pub fn capability_missing(capability: &str, setter: &str) -> Self {
        Error::CapabilityMissing {
            capability: capability.to_string(),
            message: format!("{} must be provided. Use .{}() to set it.", capability, setter),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_missing_names_the_setter() {
        let err = Error::capability_missing("MediaBackend (local)", "local_backend");
        assert_eq!(
            err.to_string(),
            "Capability missing: MediaBackend (local) - MediaBackend (local) must be provided. \
             Use .local_backend() to set it."
        );
    }
}
