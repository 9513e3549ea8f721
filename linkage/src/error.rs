use crate::model::{EdgeId, ShapeId};

/// Why a connect attempt was refused. The drawing is unchanged whenever one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("edge {0} does not exist")]
    MissingEdge(EdgeId),
    #[error("shape {0} does not exist")]
    MissingShape(ShapeId),
    #[error("edge {0} is already connected")]
    AlreadyConnected(EdgeId),
    #[error("edge {0} is missing an end")]
    Incomplete(EdgeId),
    #[error("locator on shape {0} has a non-finite field")]
    NonFiniteLocator(ShapeId),
    #[error("shape {0} cannot take part in a dependency")]
    NotParticipant(ShapeId),
    #[error("both ends are owned by shape {0}")]
    SameOwner(ShapeId),
    #[error("{from} already precedes {to}")]
    Duplicate { from: ShapeId, to: ShapeId },
    #[error("{from} -> {to} would close a cycle")]
    Cycle { from: ShapeId, to: ShapeId },
}

impl ConnectError {
    /// Stable machine-readable code, shared with the JSON loader and bindings.
    pub fn code(&self) -> &'static str {
        match self {
            ConnectError::MissingEdge(_) | ConnectError::MissingShape(_) => "invalid_id",
            ConnectError::AlreadyConnected(_) => "already_connected",
            ConnectError::Incomplete(_) => "incomplete",
            ConnectError::NonFiniteLocator(_) => "non_finite",
            ConnectError::NotParticipant(_) => "not_participant",
            ConnectError::SameOwner(_) => "same_owner",
            ConnectError::Duplicate { .. } => "duplicate",
            ConnectError::Cycle { .. } => "cycle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttrError {
    #[error("attribute '{name}' should be {expected}")]
    WrongType { name: &'static str, expected: &'static str },
    #[error("attribute '{name}' out of bounds: {got}")]
    OutOfBounds { name: &'static str, got: f64 },
}
