//! The converter registry and route search.
//!
//! A [`ConverterFactory`] is built mutably at startup (register every
//! converter and any pre-built multi-hop package), then frozen behind an
//! `Arc` and shared by every data object. After the freeze the only
//! mutation is the internal package memoization cache, which is a
//! cache-only optimization: it never changes which route a query returns,
//! only how fast repeat queries answer.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::converter::report::RouteOrigin;
use crate::converter::{ConverterPackage, RepresentationConverter};
use crate::error::MultirepError;
use crate::representation::KindId;

/// A resolved conversion route together with how it was found.
#[derive(Clone)]
pub struct ConversionPlan {
    pub package: Arc<ConverterPackage>,
    pub origin: RouteOrigin,
}

/// Registry of converters and converter packages.
pub struct ConverterFactory {
    /// One-hop converters in registration order. Lookup scans this
    /// sequence, so the same query always yields the same converter.
    converters: Vec<Arc<dyn RepresentationConverter>>,
    /// Known multi-hop packages keyed by (source kind, target kind):
    /// pre-registered ones plus memoized synthesis results.
    packages: RwLock<HashMap<(KindId, KindId), Arc<ConverterPackage>>>,
}

impl ConverterFactory {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
            packages: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a one-hop converter.
    ///
    /// A second registration for the same (source, target) kind pair is
    /// rejected: lookups are deterministic, and silently shadowing an
    /// earlier edge would change which conversion (and which rounding)
    /// existing callers get.
    pub fn register_converter(
        &mut self,
        converter: Arc<dyn RepresentationConverter>,
    ) -> Result<(), MultirepError> {
        let (from, to) = (converter.source_kind(), converter.target_kind());
        if self
            .converters
            .iter()
            .any(|c| c.source_kind() == from && c.target_kind() == to)
        {
            return Err(MultirepError::DuplicateConverter { from, to });
        }
        self.converters.push(converter);
        Ok(())
    }

    /// Registers a pre-built multi-hop package.
    pub fn register_package(&mut self, package: ConverterPackage) -> Result<(), MultirepError> {
        let key = (package.source_kind(), package.target_kind());
        let map = self.packages.get_mut().expect("package cache poisoned");
        if map.contains_key(&key) {
            return Err(MultirepError::DuplicateConverter {
                from: key.0,
                to: key.1,
            });
        }
        map.insert(key, Arc::new(package));
        Ok(())
    }

    /// Looks up the registered one-hop converter for (`from`, `to`).
    ///
    /// Scans in registration order; an exact registered edge is always
    /// preferred over any synthesized chain.
    pub fn converter_for(
        &self,
        from: KindId,
        to: KindId,
    ) -> Option<Arc<dyn RepresentationConverter>> {
        self.converters
            .iter()
            .find(|c| c.source_kind() == from && c.target_kind() == to)
            .cloned()
    }

    /// Finds a multi-hop package from `from` to `to`.
    ///
    /// `valid_kinds` are the representation kinds currently valid on the
    /// querying data object, in slot order. The search policy is, in
    /// order:
    ///
    /// 1. a package already known (registered or previously synthesized)
    ///    for exactly (`from`, `to`);
    /// 2. the shortest known package starting at any of `valid_kinds` —
    ///    adopted as-is, so the returned package may start at a different
    ///    kind than `from` ("convert from whichever valid representation
    ///    is cheapest to extend from");
    /// 3. a synthesized two-hop bridge `from -> X -> to`, accepted only
    ///    when the `X -> to` edge is the exact reverse of some registered
    ///    `to -> X` edge (a round-trip-compatible bridge). The result is
    ///    memoized for reuse.
    ///
    /// This is deliberately not a general shortest-path search over the
    /// whole converter graph: step 2 only considers paths already live as
    /// packages for the object's valid kinds, so a globally shorter path
    /// that is not among them is not found. Widening the search would
    /// change which route (and which numerical rounding) existing callers
    /// get, so the narrow policy is kept.
    pub fn package_for(
        &self,
        from: KindId,
        to: KindId,
        valid_kinds: &[KindId],
    ) -> Option<Arc<ConverterPackage>> {
        self.package_with_origin(from, to, valid_kinds)
            .map(|plan| plan.package)
    }

    /// Resolves a full route from `from` to `to`, preferring a direct
    /// registered converter over any package.
    pub fn plan(&self, from: KindId, to: KindId, valid_kinds: &[KindId]) -> Option<ConversionPlan> {
        if let Some(direct) = self.converter_for(from, to) {
            let package = ConverterPackage::new(vec![direct])
                .expect("single converter chain is always well formed");
            return Some(ConversionPlan {
                package: Arc::new(package),
                origin: RouteOrigin::Direct,
            });
        }
        self.package_with_origin(from, to, valid_kinds)
    }

    fn package_with_origin(
        &self,
        from: KindId,
        to: KindId,
        valid_kinds: &[KindId],
    ) -> Option<ConversionPlan> {
        {
            let map = self.packages.read().expect("package cache poisoned");

            if let Some(package) = map.get(&(from, to)) {
                return Some(ConversionPlan {
                    package: Arc::clone(package),
                    origin: RouteOrigin::Registered,
                });
            }

            // Prefer extending from whichever currently valid sibling has
            // the shortest known path; ties go to the earliest slot.
            let adopted = valid_kinds
                .iter()
                .filter_map(|&kind| map.get(&(kind, to)))
                .min_by_key(|package| package.len());
            if let Some(package) = adopted {
                return Some(ConversionPlan {
                    package: Arc::clone(package),
                    origin: RouteOrigin::Adopted,
                });
            }
        }

        let package = self.synthesize_bridge(from, to)?;
        let package = Arc::new(package);
        self.packages
            .write()
            .expect("package cache poisoned")
            .insert((from, to), Arc::clone(&package));
        Some(ConversionPlan {
            package,
            origin: RouteOrigin::Synthesized,
        })
    }

    /// Attempts to build a two-hop chain `from -> x -> to` where the
    /// second hop has a registered reverse edge `to -> x`.
    fn synthesize_bridge(&self, from: KindId, to: KindId) -> Option<ConverterPackage> {
        for first in &self.converters {
            if first.source_kind() != from {
                continue;
            }
            let mid = first.target_kind();
            if mid == to {
                continue;
            }
            for second in &self.converters {
                if second.source_kind() != mid || second.target_kind() != to {
                    continue;
                }
                let has_reverse = self
                    .converters
                    .iter()
                    .any(|c| second.is_converter_reverse(c.as_ref()));
                if has_reverse {
                    let chain = vec![Arc::clone(first), Arc::clone(second)];
                    return ConverterPackage::new(chain).ok();
                }
            }
        }
        None
    }
}

impl Default for ConverterFactory {
    fn default() -> Self {
        Self::new()
    }
}
