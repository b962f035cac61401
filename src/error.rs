use thiserror::Error;

/// The smallest maximum degree a [`BpTree`](crate::BpTree) supports.
///
/// Below this bound the internal-node split point degenerates and the tree
/// cannot keep its occupancy guarantees.
pub const MIN_MAX_DEGREE: usize = 4;

/// Errors reported by [`BpTree`](crate::BpTree) operations.
///
/// Missing keys and empty ranges are normal negative results, not errors;
/// every variant here is a contract violation on the caller's side. A failed
/// operation never leaves the tree in a corrupt state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The constructor was given a maximum degree below [`MIN_MAX_DEGREE`].
    #[error("invalid maximum degree {0}, must be at least {MIN_MAX_DEGREE}")]
    InvalidMaxDegree(usize),

    /// A record was requested from an iterator that has already run out.
    #[error("end of iteration")]
    IterationExhausted,
}
