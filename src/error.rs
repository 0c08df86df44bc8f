use thiserror::Error;

/// Top-level error type for the slicing engine.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while reconstructing closed contours from section segments.
#[derive(Debug, Error)]
pub enum ContourError {
    #[error("contour is not closed")]
    NotClosed,

    #[error("contour collapsed: {0}")]
    Collapsed(String),

    #[error("self-intersection splitting exceeded depth {depth}")]
    SplitDepthExceeded { depth: usize },
}

/// Errors related to slicing operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to slice options and tolerances.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("option {name} = {value} is invalid: {reason}")]
    InvalidValue {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown infill pattern: {0}")]
    UnknownPattern(String),

    #[error("unknown path group: {0}")]
    UnknownPathGroup(String),

    #[error("inconsistent tolerances: {0}")]
    InconsistentTolerances(String),
}

/// Convenience type alias for results using [`SliceError`].
pub type Result<T> = std::result::Result<T, SliceError>;
