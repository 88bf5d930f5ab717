//! Error types of the synergy analysis.
//!
//! The Boolean-model layer (parsers, `BooleanModel` manipulation) reports plain `String`
//! errors. These are wrapped into `DrugSynergyError::Model` once they reach the analysis.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrugSynergyError>;

#[derive(Debug, Error)]
pub enum DrugSynergyError {
    /// Invalid input: unknown drug, malformed panel or configuration file, hash collision
    /// between combinations or a missing subset of a combination.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model error: {0}")]
    Model(String),

    /// The attractor solver failed (process could not start, non-zero exit or
    /// malformed output).
    #[error("Attractor solver error: {0}")]
    Solver(String),

    /// An internal invariant of the analysis does not hold.
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DrugSynergyError {
    pub fn config<T: Into<String>>(message: T) -> Self {
        DrugSynergyError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::DrugSynergyError;

    #[test]
    fn error_messages() {
        let error = DrugSynergyError::config("Drug `X` not found");
        assert_eq!("Configuration error: Drug `X` not found", error.to_string());
        let io: DrugSynergyError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(io, DrugSynergyError::Io(_)));
        assert_eq!("IO error: missing", io.to_string());
    }
}
