//! TypedPool Tests
//!
//! Tests for:
//! - Lazy initialization and capacity doubling (8 -> 16 -> 32)
//! - Ordered read-back after push_back / insert_back
//! - Range removal compaction
//! - Parameter validation and teardown

use glam::Vec3;

use kestrel::errors::EngineError;
use kestrel::physics::{Barrier, BarrierKind};
use kestrel::pool::{ElementKind, INITIAL_CAPACITY, TypedPool};

fn barrier(tag: u32) -> Barrier {
    let mut barrier = Barrier::new(BarrierKind::Box);
    barrier.id = tag;
    barrier.set_pos(Vec3::splat(tag as f32));
    barrier
}

fn filled(n: u32) -> TypedPool<Barrier> {
    let mut pool = TypedPool::new();
    pool.init().unwrap();
    for tag in 0..n {
        pool.push_back(barrier(tag)).unwrap();
    }
    pool
}

fn tags(pool: &TypedPool<Barrier>) -> Vec<u32> {
    pool.iter().map(|b| b.id).collect()
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn new_pool_is_uninitialized() {
    let pool: TypedPool<Barrier> = TypedPool::new();
    assert!(!pool.is_initialized());
    assert_eq!(pool.kind(), ElementKind::Undefined);
    assert_eq!(pool.capacity(), 0);
    assert_eq!(pool.element_size(), 0);
}

#[test]
fn init_allocates_initial_capacity_and_fixes_kind() {
    let mut pool: TypedPool<Barrier> = TypedPool::new();
    pool.init().unwrap();

    assert_eq!(pool.capacity(), INITIAL_CAPACITY);
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.kind(), ElementKind::Barrier);
    assert_eq!(pool.element_size(), std::mem::size_of::<Barrier>());
}

#[test]
fn init_twice_keeps_contents() {
    let mut pool = filled(3);
    pool.init().unwrap();
    assert_eq!(tags(&pool), vec![0, 1, 2]);
}

#[test]
fn push_back_on_uninitialized_pool_is_rejected() {
    let mut pool: TypedPool<Barrier> = TypedPool::new();
    let err = pool.push_back(barrier(1)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParameter(_)));
    assert!(pool.is_empty());
}

// ============================================================================
// Growth
// ============================================================================

#[test]
fn push_back_reads_back_in_order_around_capacity_boundaries() {
    for n in [1, 7, 8, 9, 16, 17, 40] {
        let pool = filled(n);
        assert_eq!(tags(&pool), (0..n).collect::<Vec<_>>(), "n = {n}");
        assert!(pool.len() <= pool.capacity());
    }
}

#[test]
fn capacity_doubles_when_full() {
    assert_eq!(filled(8).capacity(), 8);
    assert_eq!(filled(9).capacity(), 16);
    assert_eq!(filled(16).capacity(), 16);
    assert_eq!(filled(17).capacity(), 32);
}

#[test]
fn insert_back_grows_in_a_loop_until_sufficient() {
    let mut pool = filled(2);
    let bulk: Vec<Barrier> = (2..30).map(barrier).collect();

    pool.insert_back(&bulk).unwrap();

    assert_eq!(pool.len(), 30);
    assert_eq!(pool.capacity(), 32);
    assert_eq!(tags(&pool), (0..30).collect::<Vec<_>>());
}

#[test]
fn insert_back_rejects_empty_slice() {
    let mut pool = filled(2);
    let err = pool.insert_back(&[]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParameter(_)));
    assert_eq!(pool.len(), 2);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn remove_single_element_shifts_tail_down() {
    let mut pool = filled(6);

    let removed = pool.remove_range(2..3).unwrap();

    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, 2);
    assert_eq!(tags(&pool), vec![0, 1, 3, 4, 5]);
    // elements before the gap are untouched
    assert_eq!(pool.get(1).unwrap().pbox.pos, Vec3::splat(1.0));
    assert_eq!(pool.get(2).unwrap().pbox.pos, Vec3::splat(3.0));
}

#[test]
fn remove_range_of_several_elements() {
    let mut pool = filled(10);
    pool.remove_range(3..7).unwrap();
    assert_eq!(tags(&pool), vec![0, 1, 2, 7, 8, 9]);
    // capacity is not shrunk by removal
    assert_eq!(pool.capacity(), 16);
}

#[test]
fn remove_range_outside_storage_is_rejected() {
    let mut pool = filled(4);
    assert!(matches!(
        pool.remove_range(3..5),
        Err(EngineError::InvalidPointer(_))
    ));
    assert_eq!(pool.len(), 4);
}

#[test]
fn empty_range_removes_nothing() {
    let mut pool = filled(4);
    assert!(pool.remove_range(2..2).unwrap().is_empty());
    assert_eq!(pool.len(), 4);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn free_resets_to_uninitialized() {
    let mut pool = filled(12);
    pool.free();

    assert!(!pool.is_initialized());
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.capacity(), 0);
    assert_eq!(pool.kind(), ElementKind::Undefined);

    pool.init().unwrap();
    pool.push_back(barrier(99)).unwrap();
    assert_eq!(tags(&pool), vec![99]);
}
