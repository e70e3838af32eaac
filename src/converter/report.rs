//! Structured reporting for planned conversion routes.
//!
//! A [`ConversionReport`] describes the route a factory query resolved:
//! where it came from (direct edge, registered package, adopted sibling
//! path, or synthesized bridge) and the hops it will take. Reports are
//! serializable for tooling and implement [`std::fmt::Display`] for
//! human-readable output.

use std::fmt;

use serde::Serialize;

use crate::converter::factory::ConversionPlan;

/// How a route was found by the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RouteOrigin {
    /// An exact registered one-hop converter.
    Direct,
    /// A package registered or previously synthesized for the exact
    /// (source, target) pair.
    Registered,
    /// A known package starting at a sibling representation that is
    /// currently valid on the same data object.
    Adopted,
    /// A two-hop bridge synthesized from reverse-paired one-hop edges.
    Synthesized,
}

impl RouteOrigin {
    /// Human-readable name for the origin.
    pub fn name(&self) -> &'static str {
        match self {
            RouteOrigin::Direct => "direct",
            RouteOrigin::Registered => "registered",
            RouteOrigin::Adopted => "adopted",
            RouteOrigin::Synthesized => "synthesized",
        }
    }
}

/// One hop of a planned route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversionStep {
    pub from: String,
    pub to: String,
}

/// A resolved route, ready for display or serialization.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionReport {
    /// Kind the route starts from. For adopted routes this is the sibling
    /// kind, not the nominal query source.
    pub from: String,
    /// Kind the route ends at.
    pub to: String,
    pub origin: RouteOrigin,
    pub steps: Vec<ConversionStep>,
}

impl ConversionReport {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len()
    }
}

/// Builds a report describing a resolved plan.
pub fn build_conversion_report(plan: &ConversionPlan) -> ConversionReport {
    let steps = plan
        .package
        .converters()
        .iter()
        .map(|converter| ConversionStep {
            from: converter.source_kind().to_string(),
            to: converter.target_kind().to_string(),
        })
        .collect();

    ConversionReport {
        from: plan.package.source_kind().to_string(),
        to: plan.package.target_kind().to_string(),
        origin: plan.origin,
        steps,
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {} hop(s)):",
            self.from,
            self.to,
            self.origin.name(),
            self.hop_count()
        )?;
        for step in &self.steps {
            write!(f, " [{} -> {}]", step.from, step.to)?;
        }
        Ok(())
    }
}
