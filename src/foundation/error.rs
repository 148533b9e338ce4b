/// Convenience result type used across backdrop.
pub type BackdropResult<T> = Result<T, BackdropError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum BackdropError {
    /// Caller contract violations: zero-sized inputs, mismatched buffers, unsupported modes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes could not be turned into a pixel surface.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors raised while compositing or encoding a canvas.
    #[error("render error: {0}")]
    Render(String),

    /// Malformed output configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackdropError {
    /// Build a [`BackdropError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BackdropError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BackdropError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BackdropError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
