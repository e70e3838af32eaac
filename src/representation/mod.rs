//! Representations: the concrete storages a data object can take.
//!
//! A representation is one in-memory (or in-device) encoding of a data
//! object's content, e.g. a CPU byte buffer versus a GPU texture handle.
//! The cache in [`crate::data`] owns at most one representation per
//! concrete kind and keeps them lazily consistent through the converter
//! graph in [`crate::converter`].

mod ram;

pub use ram::BufferRam;

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::MultirepError;
use crate::format::DataFormat;

/// Identifies a concrete representation kind.
///
/// This is the tag used everywhere the cache dispatches on "which kind of
/// representation is this": slot lookup, converter endpoints, and package
/// memoization keys. It wraps the concrete type's [`TypeId`] together with
/// its type name for display purposes; equality and hashing consider only
/// the type id.
#[derive(Clone, Copy)]
pub struct KindId {
    type_id: TypeId,
    name: &'static str,
}

impl KindId {
    /// The kind id of the concrete representation type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The unqualified type name, e.g. `"BufferRam"`.
    pub fn name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for KindId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for KindId {}

impl std::hash::Hash for KindId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindId({})", self.name)
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single concrete storage of a data object's content.
///
/// Implementors are owned exclusively by a [`crate::data::Data`] instance;
/// a representation never outlives its owner. Validity bookkeeping lives in
/// the owner, not here: a representation only knows how to describe, clone,
/// and resize itself.
pub trait DataRepresentation: fmt::Debug + Send {
    /// The concrete kind tag. Implementations return `KindId::of::<Self>()`.
    fn kind(&self) -> KindId;

    /// The shared format descriptor of the underlying bytes.
    fn format(&self) -> &'static DataFormat;

    /// Deep copy; the caller becomes the owner of the new representation.
    fn clone_representation(&self) -> Box<dyn DataRepresentation>;

    /// Resizes the storage to `new_len` elements in place.
    ///
    /// Reallocation invalidates any raw pointers a caller may hold into
    /// this representation. Extents the representation cannot hold are
    /// rejected with [`MultirepError::InvalidExtent`]; content is never
    /// silently truncated.
    fn resize(&mut self, new_len: usize) -> Result<(), MultirepError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn DataRepresentation + '_ {
    /// Downcasts to the concrete representation type `T`.
    pub fn downcast_ref<T: DataRepresentation + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast to the concrete representation type `T`.
    pub fn downcast_mut<T: DataRepresentation + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
