//! Error types for the engine, the session and configuration loading

use std::path::PathBuf;

use thiserror::Error;

/// Rejected placement
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },
}

/// Session-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no legal move: the board is full")]
    BoardFull,

    #[error("game is already over")]
    GameOver,
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        let err = MoveError::ColumnFull { column: 3 };
        assert_eq!(err.to_string(), "column 3 is full");
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(
            SessionError::BoardFull.to_string(),
            "no legal move: the board is full"
        );
        assert_eq!(SessionError::GameOver.to_string(), "game is already over");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("min_depth must not exceed max_depth".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_depth must not exceed max_depth"
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ConfigError::FileRead {
            path: PathBuf::from("engine.toml"),
            source: io,
        };
        assert!(err.to_string().starts_with("failed to read config file engine.toml"));
    }

    #[test]
    fn test_toml_error_converts() {
        let parse: Result<toml::Value, toml::de::Error> = toml::from_str("not = [valid");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
