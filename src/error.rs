use thiserror::Error;

/// Common result type for earmark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the earmark subcommands
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite operation error (wraps rusqlite::Error)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error (wraps ureq::Error, boxed for size)
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),

    /// OPML or RSS parse error (wraps quick_xml::Error)
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// LLM reply decoding error
    #[error("API response error: {0}")]
    ApiResponse(String),

    /// Invalid user input or malformed source data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing configuration (environment variables, required files)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::Http(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "transcript.txt",
        ));
        assert_eq!(err.to_string(), "IO error: transcript.txt");
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::Config("OpenAI API key not found".to_string());
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_ureq_error_is_boxed() {
        let err = Error::from(ureq::Error::Status(
            404,
            ureq::Response::new(404, "Not Found", "").unwrap(),
        ));
        assert!(matches!(err, Error::Http(_)));
        assert!(err.to_string().starts_with("HTTP error:"));
    }
}
