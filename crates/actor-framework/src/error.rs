//! # Framework Errors
//!
//! Errors raised by the actor runtime itself, plus the boxed entity error that
//! carries an actor's own error type back to the caller.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unique key already taken: {0}")]
    Conflict(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the actor's typed error from an `EntityError`.
    ///
    /// Returns `Err(self)` unchanged when this is a runtime error or the boxed
    /// error is of another type, so callers can fall back to their own mapping.
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }

    /// True when the actor task is gone (closed or dropped channel).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("cart is empty")]
    struct EmptyCart;

    #[test]
    fn test_downcast_entity_recovers_typed_error() {
        let err = FrameworkError::EntityError(Box::new(EmptyCart));
        assert_eq!(err.downcast_entity::<EmptyCart>().unwrap(), EmptyCart);
    }

    #[test]
    fn test_downcast_entity_keeps_runtime_errors() {
        let err = FrameworkError::ActorClosed;
        let back = err.downcast_entity::<EmptyCart>().unwrap_err();
        assert!(back.is_unavailable());

        let other = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        assert!(matches!(
            other.downcast_entity::<EmptyCart>(),
            Err(FrameworkError::EntityError(_))
        ));
    }
}
