use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Input file '{path}' not found")]
    MissingInputFile { path: String },

    #[error("Failed to read input file '{path}': {source}")]
    ParseError {
        path: String,
        #[source]
        source: Box<DeckError>,
    },

    #[error("Missing required column(s) in input: {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },

    #[error("Row {row} (line {line}): empty value in {}", fields.join(", "))]
    EmptyFieldRow {
        row: usize,
        line: u64,
        fields: Vec<String>,
    },

    #[error("Failed to build note for row {row}: {reason}")]
    NoteConstructionError { row: usize, reason: String },

    #[error("Failed to write package '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: Box<DeckError>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DeckError {
    /// Row-level problems are logged and skipped; everything else aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DeckError::EmptyFieldRow { .. } | DeckError::NoteConstructionError { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }

    pub(crate) fn parse(path: &str, source: DeckError) -> Self {
        DeckError::ParseError {
            path: path.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn write(path: &str, source: DeckError) -> Self {
        DeckError::WriteError {
            path: path.to_string(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_level_errors_are_not_fatal() {
        let empty = DeckError::EmptyFieldRow {
            row: 2,
            line: 3,
            fields: vec!["Frente".to_string()],
        };
        let construction = DeckError::NoteConstructionError {
            row: 4,
            reason: "field count mismatch".to_string(),
        };

        assert!(!empty.is_fatal());
        assert!(!construction.is_fatal());
        assert_eq!(empty.exit_code(), 0);
    }

    #[test]
    fn test_fatal_errors_exit_with_one() {
        let errors = vec![
            DeckError::MissingInputFile {
                path: "cartoes.csv".to_string(),
            },
            DeckError::SchemaError {
                missing: vec!["Verso".to_string()],
            },
            DeckError::write(
                "out.apkg",
                DeckError::IoError(std::io::Error::other("disk full")),
            ),
        ];

        for error in errors {
            assert!(error.is_fatal());
            assert_eq!(error.exit_code(), 1);
        }
    }

    #[test]
    fn test_messages_name_the_cause() {
        let schema = DeckError::SchemaError {
            missing: vec!["Frente".to_string(), "Verso".to_string()],
        };
        assert_eq!(
            schema.to_string(),
            "Missing required column(s) in input: Frente, Verso"
        );

        let write = DeckError::write(
            "out.apkg",
            DeckError::IoError(std::io::Error::other("disk full")),
        );
        assert_eq!(
            write.to_string(),
            "Failed to write package 'out.apkg': IO error: disk full"
        );
    }
}
