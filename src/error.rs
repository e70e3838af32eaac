use thiserror::Error;

use crate::representation::KindId;

/// The main error type for multirep operations.
#[derive(Debug, Error)]
pub enum MultirepError {
    /// No registered converter or discoverable package connects the two
    /// representation kinds. This is a structural error (a missing
    /// registration), not a transient one; the cache never retries.
    #[error("no converter path from {from} to {to}")]
    NoConverter { from: KindId, to: KindId },

    /// A representation of this kind is already owned by the data object.
    #[error("representation of kind {kind} already present")]
    DuplicateRepresentation { kind: KindId },

    /// A converter for this exact kind pair is already registered.
    #[error("converter from {from} to {to} already registered")]
    DuplicateConverter { from: KindId, to: KindId },

    /// The operation referred to a representation kind the data object
    /// does not currently own.
    #[error("no representation of kind {kind} present")]
    RepresentationNotFound { kind: KindId },

    /// A converter was handed a source representation of a kind it does
    /// not accept.
    #[error("converter expected source of kind {expected}, got {found}")]
    UnsupportedSource { expected: KindId, found: KindId },

    /// A converter's `create_from` returned a representation of a kind
    /// other than its declared target.
    #[error("converter declared target {expected} but produced {produced}")]
    ProducedWrongKind { expected: KindId, produced: KindId },

    /// A stale representation needs refreshing but no valid representation
    /// remains on the object to source the conversion from.
    #[error("no valid representation available as a conversion source")]
    NoValidSource,

    /// A representation was asked to resize to an extent it cannot hold.
    #[error("invalid extent: {requested}")]
    InvalidExtent { requested: usize },

    /// A converter package must contain at least one converter, and each
    /// converter's source must match the previous converter's target.
    #[error("converter package is empty or not contiguous")]
    MalformedPackage,

    /// The per-object representation limit was reached.
    #[error("representation limit of {limit} reached")]
    TooManyRepresentations { limit: usize },
}
