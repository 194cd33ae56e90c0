//! Error types for the condoc engine

use thiserror::Error;

/// Main error type for engine operations
///
/// The tag pass itself never fails: lookup misses resolve to the empty
/// string and unmatched patterns are ordinary content. The only failure
/// boundary is loading the data context.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Data input was neither a readable JSON file nor valid JSON text
    #[error("Failed to load data: {message}")]
    DataLoad {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EngineError {
    /// Build a `DataLoad` error with the underlying cause attached.
    pub fn data_load(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataLoad {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Returns `true` for errors raised while loading the data context.
    #[must_use]
    pub fn is_data_load(&self) -> bool {
        matches!(self, Self::DataLoad { .. })
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_load_display() {
        let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad");
        let err = EngineError::data_load("input is not valid JSON", cause);
        assert_eq!(err.to_string(), "Failed to load data: input is not valid JSON");
        assert!(err.is_data_load());
    }

    #[test]
    fn test_data_load_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = EngineError::data_load("cannot read data.json", io);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("gone"));
    }
}
