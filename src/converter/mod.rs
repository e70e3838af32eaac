//! The converter graph: directed edges between representation kinds.
//!
//! A [`RepresentationConverter`] is a single edge — it can create a
//! representation of its target kind from one of its source kind, and it
//! can refresh an existing, stale target in place. A
//! [`ConverterPackage`] is an ordered chain of converters forming a
//! multi-hop path. The [`ConverterFactory`] registers both and answers
//! route queries for the cache in [`crate::data`].

mod factory;
pub mod report;

pub use factory::{ConversionPlan, ConverterFactory};
pub use report::{ConversionReport, ConversionStep, RouteOrigin};

use std::sync::Arc;

use crate::error::MultirepError;
use crate::representation::{DataRepresentation, KindId};

/// A directed edge in the converter graph.
///
/// Converters are stateless or lightweight-stateful objects registered
/// once into a [`ConverterFactory`] and shared (`Send + Sync`) by every
/// data object from then on.
pub trait RepresentationConverter: Send + Sync {
    /// The kind this converter reads from.
    fn source_kind(&self) -> KindId;

    /// The kind this converter produces.
    fn target_kind(&self) -> KindId;

    /// Pure O(1) predicate: does `candidate` have this converter's target
    /// kind?
    fn can_convert_to(&self, candidate: &dyn DataRepresentation) -> bool {
        candidate.kind() == self.target_kind()
    }

    /// Allocates and populates a brand-new representation of the target
    /// kind from `source`.
    ///
    /// Fails with [`MultirepError::UnsupportedSource`] if `source` is not
    /// of the source kind, even though callers are expected to have
    /// checked the kinds already.
    fn create_from(
        &self,
        source: &dyn DataRepresentation,
    ) -> Result<Box<dyn DataRepresentation>, MultirepError>;

    /// Refreshes `target` in place from a newer `source`.
    ///
    /// The target keeps its identity and, where possible, its allocation;
    /// this is the path taken when a representation already exists but is
    /// merely stale.
    fn update(
        &self,
        source: &dyn DataRepresentation,
        target: &mut dyn DataRepresentation,
    ) -> Result<(), MultirepError>;

    /// True if `other`'s (source, target) kind pair is the exact inverse
    /// of this converter's. Reverse pairs are treated as round-trip-safe
    /// bridges when the factory synthesizes two-hop packages.
    fn is_converter_reverse(&self, other: &dyn RepresentationConverter) -> bool {
        self.source_kind() == other.target_kind() && self.target_kind() == other.source_kind()
    }
}

/// An ordered chain of converters forming a multi-hop conversion path.
///
/// Packages are immutable once built: the chain is validated to be
/// non-empty and contiguous (each hop starts where the previous one
/// ended).
pub struct ConverterPackage {
    converters: Vec<Arc<dyn RepresentationConverter>>,
}

impl ConverterPackage {
    /// Builds a package from a converter chain.
    ///
    /// Fails with [`MultirepError::MalformedPackage`] if the chain is
    /// empty or not contiguous.
    pub fn new(converters: Vec<Arc<dyn RepresentationConverter>>) -> Result<Self, MultirepError> {
        if converters.is_empty() {
            return Err(MultirepError::MalformedPackage);
        }
        for pair in converters.windows(2) {
            if pair[0].target_kind() != pair[1].source_kind() {
                return Err(MultirepError::MalformedPackage);
            }
        }
        Ok(Self { converters })
    }

    /// The kind the chain starts from.
    pub fn source_kind(&self) -> KindId {
        self.converters[0].source_kind()
    }

    /// The kind the chain ends at.
    pub fn target_kind(&self) -> KindId {
        self.converters[self.converters.len() - 1].target_kind()
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// True for a zero-hop package; never observed, packages are non-empty
    /// by construction.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// The hops in order.
    pub fn converters(&self) -> &[Arc<dyn RepresentationConverter>] {
        &self.converters
    }
}

impl std::fmt::Debug for ConverterPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds = vec![self.source_kind().to_string()];
        kinds.extend(self.converters.iter().map(|c| c.target_kind().to_string()));
        write!(f, "ConverterPackage({})", kinds.join(" -> "))
    }
}
