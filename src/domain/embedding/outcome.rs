//! Outcome of an embedding call that may have degraded to the local fallback

/// Result of an embedding operation that never fails outright
///
/// `Degraded` carries the fallback value together with the reason the primary
/// path was not used, so callers can observe which path produced the vectors.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutcome<T> {
    /// Produced by the configured provider
    Ok(T),
    /// Produced by the deterministic fallback
    Degraded { value: T, reason: String },
}

impl<T> EmbeddingOutcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Why the fallback was used, if it was
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EmbeddingOutcome<U> {
        match self {
            Self::Ok(value) => EmbeddingOutcome::Ok(f(value)),
            Self::Degraded { value, reason } => EmbeddingOutcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}
