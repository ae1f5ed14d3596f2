use std::path::PathBuf;
use thiserror::Error;

/// Location and description of the first syntax error in a source file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum InjectError {
    #[error("{0}")]
    Argument(String),

    #[error("Can't find the project folder: {}", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("File system error at {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("Function \"{symbol}\" was not found in the file {file}")]
    SymbolNotFound { symbol: String, file: String },
}

impl InjectError {
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InjectError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Errors caused by how the tool was invoked; the CLI prints its help after these.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            InjectError::Argument(_) | InjectError::ProjectNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, InjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_names_symbol_and_file() {
        let err = InjectError::SymbolNotFound {
            symbol: "Vector.add".to_string(),
            file: "vector.py".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Function \"Vector.add\" was not found in the file vector.py"
        );
    }

    #[test]
    fn test_parse_error_includes_location() {
        let err = InjectError::Parse {
            path: PathBuf::from("broken.py"),
            source: SyntaxError {
                line: 3,
                column: 7,
                message: "invalid syntax".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse broken.py: invalid syntax at line 3, column 7"
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(InjectError::Argument("x".into()).is_usage_error());
        assert!(InjectError::ProjectNotFound(PathBuf::from("p")).is_usage_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(!InjectError::fs("p", io).is_usage_error());
    }
}
