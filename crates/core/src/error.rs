use thiserror::Error;

/// Result type alias for backscroll-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the backscroll viewport
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for config and log-file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Subscription delivery failures reported by the stream source
    #[error("subscription error: {0}")]
    Subscription(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let io_err: Error = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"));
        assert_eq!(io_err.to_string(), "I/O error: file not found");

        let config_err = Error::Config("bad track height".to_string());
        assert_eq!(config_err.to_string(), "configuration error: bad track height");

        let parse_err = Error::Parse("invalid JSON".to_string());
        assert_eq!(parse_err.to_string(), "parse error: invalid JSON");

        let sub_err = Error::Subscription("stream closed".to_string());
        assert_eq!(sub_err.to_string(), "subscription error: stream closed");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: Error = io_err.into();
        assert_eq!(error.to_string(), "I/O error: denied");
    }

    #[test]
    fn test_result_type_alias() {
        let ok: Result<i32> = Ok(42);
        assert!(ok.is_ok());

        let err: Result<i32> = Err(Error::Config("oops".to_string()));
        assert!(err.is_err());
    }
}
