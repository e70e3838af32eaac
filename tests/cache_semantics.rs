//! End-to-end semantics of the representation cache: lazy creation, read
//! idempotence, the single-writer invariant, and the edit/refresh cycle.

use std::sync::Arc;

use multirep::{BufferRam, ConverterFactory, KindId};

mod common;

use common::{device_to_host, host_data, host_to_device, DeviceBuffer};

fn host_device_factory() -> (
    Arc<ConverterFactory>,
    Arc<common::CopyStats>,
    Arc<common::CopyStats>,
) {
    let mut factory = ConverterFactory::new();
    let (upload, upload_stats) = host_to_device();
    let (download, download_stats) = device_to_host();
    factory.register_converter(upload).unwrap();
    factory.register_converter(download).unwrap();
    (Arc::new(factory), upload_stats, download_stats)
}

#[test]
fn lazy_creation_makes_only_what_is_needed() {
    let (factory, upload_stats, _) = host_device_factory();
    let mut data = host_data(factory, &[1, 2, 3, 4]);

    assert!(!data.has_representations());

    // Requesting the default kind creates exactly one representation.
    data.representation::<BufferRam>().unwrap();
    assert_eq!(data.representation_count(), 1);
    assert_eq!(upload_stats.created(), 0);

    // Requesting another kind creates exactly one more.
    data.representation::<DeviceBuffer>().unwrap();
    assert_eq!(data.representation_count(), 2);
    assert_eq!(upload_stats.created(), 1);
}

#[test]
fn reads_are_idempotent() {
    let (factory, upload_stats, _) = host_device_factory();
    let mut data = host_data(factory, &[1, 2, 3, 4]);

    data.representation::<DeviceBuffer>().unwrap();
    let last = data.last_valid_kind();

    // A second read converts nothing, allocates nothing, moves nothing.
    data.representation::<DeviceBuffer>().unwrap();
    assert_eq!(data.representation_count(), 2);
    assert_eq!(upload_stats.created(), 1);
    assert_eq!(upload_stats.updated(), 0);
    assert_eq!(data.last_valid_kind(), last);
}

#[test]
fn reads_never_invalidate_siblings() {
    let (factory, _, _) = host_device_factory();
    let mut data = host_data(factory, &[1, 2, 3, 4]);

    data.representation::<BufferRam>().unwrap();
    data.representation::<DeviceBuffer>().unwrap();

    assert!(data.is_valid::<BufferRam>());
    assert!(data.is_valid::<DeviceBuffer>());
}

#[test]
fn editing_invalidates_every_sibling() {
    let (factory, _, _) = host_device_factory();
    let mut data = host_data(factory, &[1, 2, 3, 4]);

    data.representation::<DeviceBuffer>().unwrap();
    data.editable_representation::<BufferRam>().unwrap();

    assert!(data.has_representation::<DeviceBuffer>());
    assert!(!data.is_valid::<DeviceBuffer>());
    assert!(data.is_valid::<BufferRam>());
    assert_eq!(data.last_valid_kind(), Some(KindId::of::<BufferRam>()));
}

#[test]
fn edit_then_read_refreshes_in_place() {
    let (factory, upload_stats, _) = host_device_factory();
    let mut data = host_data(factory, &[1, 2, 3, 4]);

    // (1) First device fetch mirrors the host content.
    let device = data.representation::<DeviceBuffer>().unwrap();
    assert_eq!(device.bytes(), &[1, 2, 3, 4]);
    assert_eq!(upload_stats.created(), 1);

    // (2) Editing the host leaves the device copy stale.
    let host = data.editable_representation::<BufferRam>().unwrap();
    host.bytes_mut().copy_from_slice(&[9, 9, 9, 9]);
    assert!(!data.is_valid::<DeviceBuffer>());
    assert_eq!(data.last_valid_kind(), Some(KindId::of::<BufferRam>()));

    // (3) The next fetch refreshes the existing device copy in place:
    // an update, not a second create_from.
    let device = data.representation::<DeviceBuffer>().unwrap();
    assert_eq!(device.bytes(), &[9, 9, 9, 9]);
    assert_eq!(upload_stats.created(), 1);
    assert_eq!(upload_stats.updated(), 1);

    // The host stays valid, and the device copy took over as last valid.
    assert!(data.is_valid::<BufferRam>());
    assert_eq!(data.last_valid_kind(), Some(KindId::of::<DeviceBuffer>()));
}

#[test]
fn reverse_pair_round_trips_content() {
    let (factory, _, download_stats) = host_device_factory();
    let mut data = host_data(factory, &[5, 6, 7, 8]);

    data.representation::<DeviceBuffer>().unwrap();

    // Mutate on the device side; the host copy goes stale.
    let device = data.editable_representation::<DeviceBuffer>().unwrap();
    device.set_bytes(&[8, 7, 6, 5]);
    assert!(!data.is_valid::<BufferRam>());

    // Reading the host back goes through the reverse converter and
    // reproduces the device content exactly (lossless byte copy).
    let host = data.representation::<BufferRam>().unwrap();
    assert_eq!(host.bytes(), &[8, 7, 6, 5]);
    assert_eq!(download_stats.updated(), 1);
}

#[test]
fn copy_preserves_validity_and_last_valid_position() {
    let (factory, _, _) = host_device_factory();
    let mut data = host_data(Arc::clone(&factory), &[1, 2, 3, 4]);

    data.representation::<DeviceBuffer>().unwrap();
    data.editable_representation::<BufferRam>().unwrap();

    let mut target = host_data(factory, &[0, 0, 0, 0]);
    data.copy_representations_to(&mut target);

    assert_eq!(target.representation_count(), 2);
    assert!(target.is_valid::<BufferRam>());
    assert!(!target.is_valid::<DeviceBuffer>());
    assert_eq!(target.last_valid_kind(), Some(KindId::of::<BufferRam>()));
}
