//! Multirep: a lazy multi-representation data cache.
//!
//! One logical piece of data — a volume, an image layer, a vertex buffer —
//! can live in several concrete storages at once: a CPU array here, a
//! device-side copy there. Multirep keeps those representations lazily and
//! incrementally consistent: a [`data::Data`] object owns at most one
//! representation per kind, tracks per-slot validity, and on request
//! materializes the cheapest route from whichever representation is
//! currently valid to the one asked for, using a directed graph of
//! registered converters.
//!
//! # Modules
//!
//! - [`data`]: the cache engine (`Data`, validity bookkeeping)
//! - [`representation`]: the `DataRepresentation` trait, kind tags, and
//!   the reference CPU buffer
//! - [`converter`]: converter trait, multi-hop packages, the registry and
//!   its route search, and route reports
//! - [`format`]: interned numeric/channel format descriptors
//! - [`error`]: error types for multirep operations
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use multirep::{BufferRam, ConverterFactory, Data, DataFormat, DataFormatId};
//!
//! // An empty registry still serves same-kind requests: the first access
//! // creates the default representation.
//! let factory = Arc::new(ConverterFactory::new());
//! let format = DataFormat::get(DataFormatId::Vec4UInt8);
//! let mut data = Data::new(format, factory, |format| {
//!     Ok(Box::new(BufferRam::new(format, 16)))
//! });
//!
//! assert!(!data.has_representations());
//! let buffer = data.representation::<BufferRam>().unwrap();
//! assert_eq!(buffer.len(), 16);
//! ```

pub mod converter;
pub mod data;
pub mod error;
pub mod format;
pub mod representation;

pub use converter::{
    ConversionPlan, ConversionReport, ConverterFactory, ConverterPackage, RepresentationConverter,
};
pub use data::{Data, ValidityMask};
pub use error::MultirepError;
pub use format::{DataFormat, DataFormatId, NumericType};
pub use representation::{BufferRam, DataRepresentation, KindId};
