pub type ResonanceResult<T> = Result<T, ResonanceError>;

#[derive(thiserror::Error, Debug)]
pub enum ResonanceError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("chat request failed: {0}")]
    Chat(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResonanceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn chat(msg: impl Into<String>) -> Self {
        Self::Chat(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ResonanceError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ResonanceError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(
            ResonanceError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            ResonanceError::chat("x")
                .to_string()
                .contains("chat request failed:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ResonanceError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
