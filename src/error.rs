use thiserror::Error;

/// Errors raised by the matrix and graph accessors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("index {index} is out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("no node is labeled {0:?}")]
    NodeNotFound(String),

    #[error("node label {0:?} is used more than once")]
    DuplicateLabel(String),

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("matrix is not diagonally dominant")]
    NotDiagonallyDominant,

    #[error("matrix is not positive semi-definite")]
    NotPositiveSemiDefinite,
}

pub type Result<T> = std::result::Result<T, MatrixError>;

/// Errors raised while reading graph or structure files.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("graph file is empty")]
    Empty,

    #[error("line {line}: could not parse {token:?} as {expected}")]
    Parse {
        line: usize,
        token: String,
        expected: &'static str,
    },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} values after the node count, found {found}")]
    TokenCount { expected: usize, found: usize },

    #[error("matrix is not symmetric at ({row}, {col})")]
    Asymmetric { row: usize, col: usize },

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Errors raised while reading the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing key['{0}'] from configuration file")]
    MissingKey(&'static str),

    #[error("invalid value {value:?} for key['{key}']: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
