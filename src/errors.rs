//! Shatter and pattern errors

use crate::float_types::Real;

/// Reasons a shatter request is refused.
///
/// None of these are fatal: the request becomes a no-op and the previously
/// produced fragment batch is left as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShatterError {
    /// (NoPatterns) No partition pattern is loaded
    #[error("(NoPatterns) no shatter patterns are loaded")]
    NoPatterns,
    /// (UnsupportedMesh) The mesh cannot be split into single-material fragments
    #[error("(UnsupportedMesh) failed to shatter mesh {mesh:?}: {reason}")]
    UnsupportedMesh { mesh: String, reason: UnsupportedReason },
    /// (DegenerateBoundingRadius) The mesh bounding sphere has no usable extent
    #[error("(DegenerateBoundingRadius) mesh {mesh:?} has bounding radius {radius}")]
    DegenerateBoundingRadius { mesh: String, radius: Real },
    /// (DegenerateDirection) The impact direction has no usable length
    #[error("(DegenerateDirection) impact direction has zero or non-finite length")]
    DegenerateDirection,
}

/// Why a mesh failed shatter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedReason {
    #[error("too many passes ({0})")]
    TooManyPasses(usize),
    #[error("per-polygon material array in pass {0}")]
    MaterialArray(usize),
    #[error("per-polygon shader array in pass {0}")]
    ShaderArray(usize),
    #[error("texture array in pass {pass} stage {stage}")]
    TextureArray { pass: usize, stage: usize },
}

/// Reasons a transform hierarchy cannot become a partition pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// (TooFewPivots) A pattern needs a root pivot plus at least one plane
    #[error("(TooFewPivots) pattern has {0} pivots, at least 2 are required")]
    TooFewPivots(usize),
    /// (TooManyPivots) The pattern would produce more fragments than allowed
    #[error("(TooManyPivots) pattern has {count} pivots, the limit is {limit}")]
    TooManyPivots { count: usize, limit: usize },
    /// (RootOutOfRange) The configured root bone does not exist in the pattern
    #[error("(RootOutOfRange) root bone {root} is out of range for {count} pivots")]
    RootOutOfRange { root: usize, count: usize },
    /// (InvalidParent) A pivot refers to a parent that does not precede it
    #[error("(InvalidParent) pivot {pivot} has invalid parent {parent:?}")]
    InvalidParent { pivot: usize, parent: Option<usize> },
}
