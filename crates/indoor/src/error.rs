use foundation::{FeatureId, FloorId};
use layers::FloorSetError;

use crate::renderer::RendererError;

#[derive(Debug, Clone, PartialEq)]
pub enum IndoorError {
    InvalidConfig(String),
    UnknownFloor(FloorId),
    FeatureNotFound(FeatureId),
    /// A lookup that must match exactly one element matched zero or several.
    InvariantViolation(String),
    Renderer(RendererError),
    Io(String),
    Parse(String),
}

impl std::fmt::Display for IndoorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndoorError::InvalidConfig(msg) => write!(f, "invalid indoor config: {msg}"),
            IndoorError::UnknownFloor(id) => write!(f, "floor {id} is not configured"),
            IndoorError::FeatureNotFound(id) => {
                write!(f, "feature {id} is not among the loaded features")
            }
            IndoorError::InvariantViolation(msg) => write!(f, "invariant violated: {msg}"),
            IndoorError::Renderer(err) => write!(f, "renderer error: {err}"),
            IndoorError::Io(msg) => write!(f, "io error: {msg}"),
            IndoorError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for IndoorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndoorError::Renderer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RendererError> for IndoorError {
    fn from(err: RendererError) -> Self {
        IndoorError::Renderer(err)
    }
}

impl From<FloorSetError> for IndoorError {
    fn from(err: FloorSetError) -> Self {
        IndoorError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::IndoorError;
    use crate::renderer::RendererError;
    use foundation::FloorId;
    use layers::{FloorSetError, LayerId};
    use std::error::Error as _;

    #[test]
    fn messages_name_the_offender() {
        assert_eq!(
            IndoorError::UnknownFloor(FloorId(-9)).to_string(),
            "floor -9 is not configured"
        );
        let err: IndoorError = FloorSetError::Duplicate(FloorId(2)).into();
        assert_eq!(
            err.to_string(),
            "invalid indoor config: floor 2 is listed more than once"
        );
    }

    #[test]
    fn renderer_errors_chain() {
        let err: IndoorError = RendererError::UnknownLayer(LayerId::from("room-9")).into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("room-9"));
    }
}
