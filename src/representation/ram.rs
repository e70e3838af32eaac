//! The reference CPU representation: a format-described byte buffer.

use std::any::Any;

use crate::error::MultirepError;
use crate::format::DataFormat;
use crate::representation::{DataRepresentation, KindId};

/// A flat CPU-side buffer whose layout is described by a [`DataFormat`].
///
/// This is the customary default representation of a data object: cheap to
/// construct, and the usual seed for converters that populate device-side
/// representations.
#[derive(Clone, Debug)]
pub struct BufferRam {
    format: &'static DataFormat,
    bytes: Vec<u8>,
}

impl BufferRam {
    /// Creates a zero-initialized buffer of `len` elements.
    pub fn new(format: &'static DataFormat, len: usize) -> Self {
        Self {
            format,
            bytes: vec![0; len * format.size_in_bytes()],
        }
    }

    /// Creates a buffer over existing bytes.
    ///
    /// `bytes.len()` need not be a multiple of the element size; trailing
    /// partial elements are not counted by [`len`](Self::len).
    pub fn from_bytes(format: &'static DataFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Number of whole elements in the buffer.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.format.size_in_bytes()
    }

    /// True if the buffer holds no complete element.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl DataRepresentation for BufferRam {
    fn kind(&self) -> KindId {
        KindId::of::<Self>()
    }

    fn format(&self) -> &'static DataFormat {
        self.format
    }

    fn clone_representation(&self) -> Box<dyn DataRepresentation> {
        Box::new(self.clone())
    }

    fn resize(&mut self, new_len: usize) -> Result<(), MultirepError> {
        if new_len == 0 {
            return Err(MultirepError::InvalidExtent { requested: new_len });
        }
        self.bytes.resize(new_len * self.format.size_in_bytes(), 0);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
