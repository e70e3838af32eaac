#![allow(dead_code)]

use std::any::Any;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use multirep::{
    BufferRam, ConverterFactory, Data, DataFormat, DataFormatId, DataRepresentation, KindId,
    MultirepError, RepresentationConverter,
};

/// Fake device-side storage: stands in for a GPU texture in tests.
#[derive(Clone, Debug)]
pub struct DeviceBuffer {
    format: &'static DataFormat,
    bytes: Vec<u8>,
}

impl DeviceBuffer {
    pub fn from_bytes(format: &'static DataFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_bytes(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
    }
}

impl DataRepresentation for DeviceBuffer {
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

/// A host-visible mapping of the device copy; third kind for chain tests.
#[derive(Clone, Debug)]
pub struct MappedBuffer {
    format: &'static DataFormat,
    bytes: Vec<u8>,
}

impl MappedBuffer {
    pub fn from_bytes(format: &'static DataFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_bytes(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
    }
}

impl DataRepresentation for MappedBuffer {
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

/// Invocation counters shared between a converter and the test body.
#[derive(Debug, Default)]
pub struct CopyStats {
    created: AtomicUsize,
    updated: AtomicUsize,
}

impl CopyStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn updated(&self) -> usize {
        self.updated.load(Ordering::Relaxed)
    }
}

/// A byte-copy converter from representation `S` to `T` that counts its
/// `create_from` and `update` invocations.
pub struct CountingConverter<S: 'static, T: 'static> {
    stats: Arc<CopyStats>,
    convert: fn(&S) -> T,
    refresh: fn(&S, &mut T),
    _marker: PhantomData<fn(&S) -> T>,
}

impl<S, T> CountingConverter<S, T>
where
    S: DataRepresentation + 'static,
    T: DataRepresentation + 'static,
{
    pub fn new(
        convert: fn(&S) -> T,
        refresh: fn(&S, &mut T),
    ) -> (Arc<dyn RepresentationConverter>, Arc<CopyStats>) {
        let stats = Arc::new(CopyStats::default());
        let converter = Arc::new(Self {
            stats: Arc::clone(&stats),
            convert,
            refresh,
            _marker: PhantomData,
        });
        (converter, stats)
    }
}

impl<S, T> RepresentationConverter for CountingConverter<S, T>
where
    S: DataRepresentation + 'static,
    T: DataRepresentation + 'static,
{
    fn source_kind(&self) -> KindId {
        KindId::of::<S>()
    }

    fn target_kind(&self) -> KindId {
        KindId::of::<T>()
    }

    fn create_from(
        &self,
        source: &dyn DataRepresentation,
    ) -> Result<Box<dyn DataRepresentation>, MultirepError> {
        let source = source
            .downcast_ref::<S>()
            .ok_or(MultirepError::UnsupportedSource {
                expected: self.source_kind(),
                found: source.kind(),
            })?;
        self.stats.created.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new((self.convert)(source)))
    }

    fn update(
        &self,
        source: &dyn DataRepresentation,
        target: &mut dyn DataRepresentation,
    ) -> Result<(), MultirepError> {
        let target_found = target.kind();
        let source = source
            .downcast_ref::<S>()
            .ok_or(MultirepError::UnsupportedSource {
                expected: self.source_kind(),
                found: source.kind(),
            })?;
        let target = target
            .downcast_mut::<T>()
            .ok_or(MultirepError::UnsupportedSource {
                expected: self.target_kind(),
                found: target_found,
            })?;
        self.stats.updated.fetch_add(1, Ordering::Relaxed);
        (self.refresh)(source, target);
        Ok(())
    }
}

pub fn host_to_device() -> (Arc<dyn RepresentationConverter>, Arc<CopyStats>) {
    CountingConverter::<BufferRam, DeviceBuffer>::new(
        |src| DeviceBuffer::from_bytes(src.format(), src.bytes().to_vec()),
        |src, dst| dst.set_bytes(src.bytes()),
    )
}

pub fn device_to_host() -> (Arc<dyn RepresentationConverter>, Arc<CopyStats>) {
    CountingConverter::<DeviceBuffer, BufferRam>::new(
        |src| BufferRam::from_bytes(src.format(), src.bytes().to_vec()),
        |src, dst| {
            let bytes = src.bytes().to_vec();
            dst.bytes_mut().copy_from_slice(&bytes);
        },
    )
}

pub fn device_to_mapped() -> (Arc<dyn RepresentationConverter>, Arc<CopyStats>) {
    CountingConverter::<DeviceBuffer, MappedBuffer>::new(
        |src| MappedBuffer::from_bytes(src.format(), src.bytes().to_vec()),
        |src, dst| dst.set_bytes(src.bytes()),
    )
}

pub fn mapped_to_device() -> (Arc<dyn RepresentationConverter>, Arc<CopyStats>) {
    CountingConverter::<MappedBuffer, DeviceBuffer>::new(
        |src| DeviceBuffer::from_bytes(src.format(), src.bytes().to_vec()),
        |src, dst| dst.set_bytes(src.bytes()),
    )
}

/// A data object whose default representation is a host buffer holding
/// `values` (one byte per element, uint8 format).
pub fn host_data(factory: Arc<ConverterFactory>, values: &[u8]) -> Data {
    let values = values.to_vec();
    Data::new(
        DataFormat::get(DataFormatId::UInt8),
        factory,
        move |format| Ok(Box::new(BufferRam::from_bytes(format, values.clone()))),
    )
}
