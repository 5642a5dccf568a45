pub type FoldResult<T> = Result<T, FoldError>;

#[derive(thiserror::Error, Debug)]
pub enum FoldError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("orientation invariant violated: {0}")]
    Orientation(String),

    #[error("canvas error: {0}")]
    Canvas(String),

    #[error("recipe error: {0}")]
    Recipe(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FoldError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn orientation(msg: impl Into<String>) -> Self {
        Self::Orientation(msg.into())
    }

    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }

    pub fn recipe(msg: impl Into<String>) -> Self {
        Self::Recipe(msg.into())
    }

    /// Parameter errors are raised before the canvas is touched; everything else may leave
    /// partial edits behind for the undo group to roll back.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
