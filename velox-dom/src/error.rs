use thiserror::Error;

/// Errors raised while loading a platform configuration overlay.
///
/// Descriptor construction itself never fails; see [`crate::create_element`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid platform config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("empty tag name in `{0}`")]
    EmptyTag(&'static str),
}
