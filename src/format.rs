//! Interned data format descriptors.
//!
//! A [`DataFormat`] describes the numeric/channel layout of the bytes
//! behind a representation (e.g. "4-channel unsigned 8-bit"). Formats are
//! immutable and interned in a static table: a data object references a
//! format by `&'static DataFormat`, it never owns one. Two representations
//! of the same data object always share the same format reference.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The numeric interpretation of a format's components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    /// IEEE 754 floating point.
    Float,
    /// Two's-complement signed integer.
    SignedInteger,
    /// Unsigned integer.
    UnsignedInteger,
}

/// Identifier for one of the interned formats.
///
/// The discriminant doubles as the index into the static format table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFormatId {
    UInt8,
    UInt16,
    UInt32,
    Int8,
    Int16,
    Int32,
    Float32,
    Float64,
    Vec2UInt8,
    Vec3UInt8,
    Vec4UInt8,
    Vec2Float32,
    Vec3Float32,
    Vec4Float32,
}

/// An immutable descriptor of a numeric/channel layout.
///
/// Obtain instances through [`DataFormat::get`]; the returned reference is
/// `'static` and may be freely shared across threads and data objects.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DataFormat {
    id: DataFormatId,
    numeric: NumericType,
    components: u8,
    /// Bits per component.
    precision: u8,
}

impl DataFormat {
    const fn new(id: DataFormatId, numeric: NumericType, components: u8, precision: u8) -> Self {
        Self {
            id,
            numeric,
            components,
            precision,
        }
    }

    /// Returns the interned descriptor for `id`.
    pub fn get(id: DataFormatId) -> &'static DataFormat {
        &FORMATS[id as usize]
    }

    /// The identifier of this format.
    pub fn id(&self) -> DataFormatId {
        self.id
    }

    /// The numeric interpretation of each component.
    pub fn numeric_type(&self) -> NumericType {
        self.numeric
    }

    /// Number of components (channels) per element.
    pub fn components(&self) -> usize {
        self.components as usize
    }

    /// Bits per component.
    pub fn precision(&self) -> usize {
        self.precision as usize
    }

    /// Size of one element (all components) in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.components as usize * (self.precision as usize / 8)
    }

    /// Canonical lowercase name, e.g. `"vec4uint8"`.
    pub fn name(&self) -> &'static str {
        match self.id {
            DataFormatId::UInt8 => "uint8",
            DataFormatId::UInt16 => "uint16",
            DataFormatId::UInt32 => "uint32",
            DataFormatId::Int8 => "int8",
            DataFormatId::Int16 => "int16",
            DataFormatId::Int32 => "int32",
            DataFormatId::Float32 => "float32",
            DataFormatId::Float64 => "float64",
            DataFormatId::Vec2UInt8 => "vec2uint8",
            DataFormatId::Vec3UInt8 => "vec3uint8",
            DataFormatId::Vec4UInt8 => "vec4uint8",
            DataFormatId::Vec2Float32 => "vec2float32",
            DataFormatId::Vec3Float32 => "vec3float32",
            DataFormatId::Vec4Float32 => "vec4float32",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Table order must match the DataFormatId discriminants.
static FORMATS: [DataFormat; 14] = [
    DataFormat::new(DataFormatId::UInt8, NumericType::UnsignedInteger, 1, 8),
    DataFormat::new(DataFormatId::UInt16, NumericType::UnsignedInteger, 1, 16),
    DataFormat::new(DataFormatId::UInt32, NumericType::UnsignedInteger, 1, 32),
    DataFormat::new(DataFormatId::Int8, NumericType::SignedInteger, 1, 8),
    DataFormat::new(DataFormatId::Int16, NumericType::SignedInteger, 1, 16),
    DataFormat::new(DataFormatId::Int32, NumericType::SignedInteger, 1, 32),
    DataFormat::new(DataFormatId::Float32, NumericType::Float, 1, 32),
    DataFormat::new(DataFormatId::Float64, NumericType::Float, 1, 64),
    DataFormat::new(DataFormatId::Vec2UInt8, NumericType::UnsignedInteger, 2, 8),
    DataFormat::new(DataFormatId::Vec3UInt8, NumericType::UnsignedInteger, 3, 8),
    DataFormat::new(DataFormatId::Vec4UInt8, NumericType::UnsignedInteger, 4, 8),
    DataFormat::new(DataFormatId::Vec2Float32, NumericType::Float, 2, 32),
    DataFormat::new(DataFormatId::Vec3Float32, NumericType::Float, 3, 32),
    DataFormat::new(DataFormatId::Vec4Float32, NumericType::Float, 4, 32),
];
