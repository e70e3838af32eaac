//! The data object: a lazy cache of multiple representations.
//!
//! A [`Data`] owns zero or more representations of one logical piece of
//! content (e.g. a CPU buffer and a GPU texture of the same values) and
//! keeps them lazily consistent. Per slot the state machine is
//! {Absent, Valid, Invalid}: representations are created on demand,
//! invalidated when a sibling is selected for editing, and refreshed from
//! the last valid representation through the converter graph on the next
//! read.
//!
//! A `Data` instance is single-threaded: reads perform lazy mutation
//! (creating and validating representations), so the accessors take
//! `&mut self` and concurrent use of one instance must be serialized by
//! the caller. The format table and the frozen converter factory are
//! shared freely.

mod validity;

pub use validity::ValidityMask;

use std::fmt;
use std::sync::Arc;

use crate::converter::{ConverterFactory, ConverterPackage};
use crate::error::MultirepError;
use crate::format::DataFormat;
use crate::representation::{DataRepresentation, KindId};

/// Constructor for the default representation, supplied at `Data`
/// construction. Invoked at most once, on the first access to an empty
/// cache; this is the only representation whose creation does not go
/// through the converter graph.
pub type DefaultRepresentationFn =
    dyn Fn(&'static DataFormat) -> Result<Box<dyn DataRepresentation>, MultirepError>
        + Send
        + Sync;

/// A multi-representation data cache.
pub struct Data {
    format: &'static DataFormat,
    factory: Arc<ConverterFactory>,
    default_repr: Arc<DefaultRepresentationFn>,
    /// Insertion-ordered owned representations, at most one per kind.
    slots: Vec<Box<dyn DataRepresentation>>,
    /// One bit per slot; bit set means the slot matches the latest edit.
    valid: ValidityMask,
    /// Slot index of the representation most recently known valid: the
    /// default conversion source and fast-path return value. `None` only
    /// while the cache is empty or when no valid slot remains.
    last_valid: Option<usize>,
}

impl Data {
    /// Creates an empty data object.
    ///
    /// `default_repr` builds the default representation the first time any
    /// representation is requested from an empty cache.
    pub fn new<F>(format: &'static DataFormat, factory: Arc<ConverterFactory>, default_repr: F) -> Self
    where
        F: Fn(&'static DataFormat) -> Result<Box<dyn DataRepresentation>, MultirepError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            format,
            factory,
            default_repr: Arc::new(default_repr),
            slots: Vec::new(),
            valid: ValidityMask::empty(),
            last_valid: None,
        }
    }

    /// The shared format descriptor.
    pub fn format(&self) -> &'static DataFormat {
        self.format
    }

    pub fn set_format(&mut self, format: &'static DataFormat) {
        self.format = format;
    }

    /// True iff any representation exists, regardless of validity.
    pub fn has_representations(&self) -> bool {
        !self.slots.is_empty()
    }

    /// True iff a representation of kind `T` exists, regardless of
    /// validity.
    pub fn has_representation<T: DataRepresentation + 'static>(&self) -> bool {
        self.index_of(KindId::of::<T>()).is_some()
    }

    /// Number of representations currently owned.
    pub fn representation_count(&self) -> usize {
        self.slots.len()
    }

    /// True iff a representation of kind `T` exists and is valid.
    pub fn is_valid<T: DataRepresentation + 'static>(&self) -> bool {
        self.index_of(KindId::of::<T>())
            .is_some_and(|index| self.valid.test(index))
    }

    /// The kind of the representation most recently known valid.
    pub fn last_valid_kind(&self) -> Option<KindId> {
        self.last_valid.map(|index| self.slots[index].kind())
    }

    /// Returns the representation of kind `T`, materializing it if needed.
    ///
    /// - Present and valid: returned as-is (no allocation, no conversion).
    /// - Present but stale: refreshed in place from the last valid
    ///   representation via the converter graph.
    /// - Absent: created through a converter route; if the cache is empty
    ///   the default representation is created first and seeds the route.
    ///
    /// After a successful call the returned representation is valid and is
    /// the last-valid representation. No other representation is
    /// invalidated.
    pub fn representation<T: DataRepresentation + 'static>(&mut self) -> Result<&T, MultirepError> {
        let kind = KindId::of::<T>();
        let index = self.ensure_representation(kind)?;
        self.slots[index]
            .downcast_ref::<T>()
            .ok_or(MultirepError::RepresentationNotFound { kind })
    }

    /// Returns a mutable representation of kind `T`, invalidating every
    /// other representation.
    ///
    /// The caller is assumed about to mutate `T` directly, so all siblings
    /// become stale and `T` is the sole valid representation (and the new
    /// conversion ground truth).
    pub fn editable_representation<T: DataRepresentation + 'static>(
        &mut self,
    ) -> Result<&mut T, MultirepError> {
        let kind = KindId::of::<T>();
        let index = self.ensure_representation(kind)?;
        self.invalidate_all_other_at(index);
        self.slots[index]
            .downcast_mut::<T>()
            .ok_or(MultirepError::RepresentationNotFound { kind })
    }

    /// Takes ownership of `repr`, appends it, marks it valid and makes it
    /// the last valid representation.
    ///
    /// A representation of an already-present kind is rejected with
    /// [`MultirepError::DuplicateRepresentation`]; allowing it would break
    /// the one-slot-per-kind lookup invariant.
    pub fn add_representation(
        &mut self,
        repr: Box<dyn DataRepresentation>,
    ) -> Result<(), MultirepError> {
        self.push_slot(repr).map(|_| ())
    }

    /// Destroys and removes the representation of kind `T`, if present.
    ///
    /// Surviving slots keep their validity; if the removed slot was the
    /// last valid one, the most recently added valid survivor takes over
    /// (or none, in which case the next access must recreate content from
    /// the default representation).
    pub fn remove_representation<T: DataRepresentation + 'static>(&mut self) -> bool {
        let Some(index) = self.index_of(KindId::of::<T>()) else {
            return false;
        };
        self.slots.remove(index);
        self.valid.remove(index);
        self.last_valid = match self.last_valid {
            Some(last) if last == index => self.pick_last_valid(),
            Some(last) if last > index => Some(last - 1),
            other => other,
        };
        true
    }

    /// Destroys and removes every representation.
    pub fn clear_representations(&mut self) {
        self.slots.clear();
        self.valid = ValidityMask::empty();
        self.last_valid = None;
    }

    /// Marks every representation except `T`'s invalid.
    ///
    /// Needed when a representation is mutated directly without going
    /// through [`editable_representation`](Self::editable_representation).
    pub fn invalidate_all_other<T: DataRepresentation + 'static>(
        &mut self,
    ) -> Result<(), MultirepError> {
        let kind = KindId::of::<T>();
        let index = self
            .index_of(kind)
            .ok_or(MultirepError::RepresentationNotFound { kind })?;
        self.invalidate_all_other_at(index);
        Ok(())
    }

    /// Bulk trust-all escape hatch: marks every representation valid.
    pub fn mark_all_valid(&mut self) {
        self.valid.set_all(self.slots.len());
        if self.last_valid.is_none() && !self.slots.is_empty() {
            self.last_valid = Some(self.slots.len() - 1);
        }
    }

    /// Deep-clones every representation into `target`, replacing its
    /// current contents and preserving validity bits and the relative
    /// last-valid position.
    pub fn copy_representations_to(&self, target: &mut Data) {
        target.clear_representations();
        for repr in &self.slots {
            target.slots.push(repr.clone_representation());
        }
        target.valid = self.valid;
        target.last_valid = self.last_valid;
    }

    /// Human-readable summary of the cache state.
    pub fn data_info(&self) -> String {
        let kinds: Vec<String> = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, repr)| {
                let state = if self.valid.test(index) { "valid" } else { "stale" };
                format!("{} ({})", repr.kind(), state)
            })
            .collect();
        let last = self
            .last_valid_kind()
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "format {}, {} representation(s) [{}], last valid: {}",
            self.format,
            self.slots.len(),
            kinds.join(", "),
            last
        )
    }

    fn index_of(&self, kind: KindId) -> Option<usize> {
        self.slots.iter().position(|repr| repr.kind() == kind)
    }

    fn valid_kind_list(&self) -> Vec<KindId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(index, _)| self.valid.test(*index))
            .map(|(_, repr)| repr.kind())
            .collect()
    }

    /// Most recently added valid slot, if any.
    fn pick_last_valid(&self) -> Option<usize> {
        (0..self.slots.len()).rev().find(|&index| self.valid.test(index))
    }

    fn invalidate_all_other_at(&mut self, index: usize) {
        for other in 0..self.slots.len() {
            if other != index {
                self.valid.clear(other);
            }
        }
        self.valid.set(index);
        self.last_valid = Some(index);
    }

    fn push_slot(&mut self, repr: Box<dyn DataRepresentation>) -> Result<usize, MultirepError> {
        if self.slots.len() >= ValidityMask::CAPACITY {
            return Err(MultirepError::TooManyRepresentations {
                limit: ValidityMask::CAPACITY,
            });
        }
        let kind = repr.kind();
        if self.index_of(kind).is_some() {
            return Err(MultirepError::DuplicateRepresentation { kind });
        }
        self.slots.push(repr);
        let index = self.slots.len() - 1;
        self.valid.set(index);
        self.last_valid = Some(index);
        Ok(index)
    }

    /// Makes the representation of `kind` present and valid, returning its
    /// slot index.
    fn ensure_representation(&mut self, kind: KindId) -> Result<usize, MultirepError> {
        if self.slots.is_empty() {
            let repr = (self.default_repr)(self.format)?;
            self.push_slot(repr)?;
        }

        if let Some(index) = self.index_of(kind) {
            if self.valid.test(index) {
                self.last_valid = Some(index);
                return Ok(index);
            }
        }

        self.convert_to(kind)
    }

    /// Runs a converter route ending at `kind`, updating stale hops in
    /// place and creating absent ones.
    fn convert_to(&mut self, kind: KindId) -> Result<usize, MultirepError> {
        let source_index = self.last_valid.ok_or(MultirepError::NoValidSource)?;
        let from = self.slots[source_index].kind();
        let valid_kinds = self.valid_kind_list();

        let plan = self
            .factory
            .plan(from, kind, &valid_kinds)
            .ok_or(MultirepError::NoConverter { from, to: kind })?;
        self.execute(plan.package.as_ref())?;

        self.index_of(kind)
            .ok_or(MultirepError::RepresentationNotFound { kind })
    }

    /// Walks a package hop by hop. Each hop prefers updating an existing
    /// representation of its target kind over creating a new one; every
    /// touched representation is marked valid and becomes last-valid.
    fn execute(&mut self, package: &ConverterPackage) -> Result<(), MultirepError> {
        // Adopted packages may start at a valid sibling rather than the
        // nominal source, so resolve the start slot from the package.
        let start = package.source_kind();
        let mut source_index = self
            .index_of(start)
            .ok_or(MultirepError::RepresentationNotFound { kind: start })?;

        for converter in package.converters() {
            let target_kind = converter.target_kind();
            if let Some(target_index) = self.index_of(target_kind) {
                let (source, target) = pair_mut(&mut self.slots, source_index, target_index);
                converter.update(source, target)?;
                self.valid.set(target_index);
                self.last_valid = Some(target_index);
                source_index = target_index;
            } else {
                let produced = converter.create_from(self.slots[source_index].as_ref())?;
                if produced.kind() != target_kind {
                    return Err(MultirepError::ProducedWrongKind {
                        expected: target_kind,
                        produced: produced.kind(),
                    });
                }
                source_index = self.push_slot(produced)?;
            }
        }
        Ok(())
    }
}

impl Clone for Data {
    fn clone(&self) -> Self {
        let mut copy = Self {
            format: self.format,
            factory: Arc::clone(&self.factory),
            default_repr: Arc::clone(&self.default_repr),
            slots: Vec::new(),
            valid: ValidityMask::empty(),
            last_valid: None,
        };
        self.copy_representations_to(&mut copy);
        copy
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("format", &self.format.name())
            .field("slots", &self.slots)
            .field("valid", &self.valid)
            .field("last_valid", &self.last_valid)
            .finish()
    }
}

/// Disjoint (shared source, mutable target) borrow of two slots.
fn pair_mut(
    slots: &mut [Box<dyn DataRepresentation>],
    source: usize,
    target: usize,
) -> (&dyn DataRepresentation, &mut dyn DataRepresentation) {
    debug_assert_ne!(source, target);
    if source < target {
        let (low, high) = slots.split_at_mut(target);
        (low[source].as_ref(), high[0].as_mut())
    } else {
        let (low, high) = slots.split_at_mut(source);
        (high[0].as_ref(), low[target].as_mut())
    }
}
