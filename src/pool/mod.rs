//! Typed Object Pools
//!
//! Growable typed arrays that double as object stores for every subsystem
//! (cameras, shaders, models, textures, lights, creatures, barriers).
//!
//! # Layout
//!
//! A [`TypedPool`] keeps exactly `len()` live elements packed at
//! `[0, len())`. Capacity starts at [`INITIAL_CAPACITY`] and doubles whenever
//! an append would overflow it. Removal closes the gap by shifting trailing
//! elements left, so element *positions* are not stable across removals;
//! only the ids embedded in the elements are (see [`registry`]).
//!
//! # Growth failures
//!
//! Storage is reserved with `try_reserve_exact`, so a failed growth reports
//! [`EngineError::AllocationFailed`] and leaves the existing elements intact.

pub mod registry;

use std::mem::size_of;
use std::ops::Range;

use crate::errors::{EngineError, Result};
use crate::physics::{Barrier, Creature};
use crate::scene::{Camera, Light, Mesh, Model, Shader, Texture};

pub use registry::{Handled, IdPolicy, Registry, SelectionScope};
pub(crate) use registry::impl_handled;

/// Capacity allocated by [`TypedPool::init`].
pub const INITIAL_CAPACITY: usize = 8;

/// Tag naming what a pool stores. Fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    #[default]
    Undefined,
    Camera,
    Shader,
    Model,
    Mesh,
    Texture,
    Light,
    Creature,
    Barrier,
}

impl ElementKind {
    /// Size in bytes of one element of this kind.
    ///
    /// Every poolable type must be registered here and implement
    /// [`PoolElement`] with the matching tag.
    #[must_use]
    pub fn element_size(self) -> usize {
        match self {
            Self::Undefined => 0,
            Self::Camera => size_of::<Camera>(),
            Self::Shader => size_of::<Shader>(),
            Self::Model => size_of::<Model>(),
            Self::Mesh => size_of::<Mesh>(),
            Self::Texture => size_of::<Texture>(),
            Self::Light => size_of::<Light>(),
            Self::Creature => size_of::<Creature>(),
            Self::Barrier => size_of::<Barrier>(),
        }
    }
}

/// Types that can live in a [`TypedPool`].
pub trait PoolElement: Sized {
    const KIND: ElementKind;
}

/// A growable, order-preserving array of `T`.
#[derive(Debug)]
pub struct TypedPool<T: PoolElement> {
    storage: Vec<T>,
    capacity: usize,
    kind: ElementKind,
}

impl<T: PoolElement> Default for TypedPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PoolElement> TypedPool<T> {
    /// Creates an uninitialized pool. Nothing is allocated until [`init`](Self::init).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: Vec::new(),
            capacity: 0,
            kind: ElementKind::Undefined,
        }
    }

    /// Allocates the initial storage and fixes the element kind.
    ///
    /// Calling `init` on an already initialized pool does nothing.
    pub fn init(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(INITIAL_CAPACITY)
            .map_err(|_| EngineError::AllocationFailed {
                requested: INITIAL_CAPACITY,
            })?;

        self.storage = storage;
        self.capacity = INITIAL_CAPACITY;
        self.kind = T::KIND;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.kind != ElementKind::Undefined
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Byte size of one element, looked up from the pool's kind tag.
    #[inline]
    #[must_use]
    pub fn element_size(&self) -> usize {
        self.kind.element_size()
    }

    /// Appends one element, doubling capacity when full.
    pub fn push_back(&mut self, elem: T) -> Result<()> {
        if !self.is_initialized() {
            return Err(EngineError::invalid("push_back on an uninitialized pool"));
        }

        self.reserve_for(self.storage.len() + 1)?;
        self.storage.push(elem);
        Ok(())
    }

    /// Appends every element of `elems`, growing capacity as many times as needed.
    pub fn insert_back(&mut self, elems: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if !self.is_initialized() {
            return Err(EngineError::invalid("insert_back on an uninitialized pool"));
        }
        if elems.is_empty() {
            return Err(EngineError::invalid("insert_back called with an empty slice"));
        }

        self.reserve_for(self.storage.len() + elems.len())?;
        self.storage.extend_from_slice(elems);
        Ok(())
    }

    /// Removes the elements in `range`, shifting everything after it left.
    ///
    /// Returns the removed elements in their original order.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<T>> {
        if range.start > range.end || range.end > self.storage.len() {
            return Err(EngineError::InvalidPointer("remove_range outside live storage"));
        }

        Ok(self.storage.drain(range).collect())
    }

    /// Releases the storage and resets the pool to its uninitialized state.
    pub fn free(&mut self) {
        self.storage = Vec::new();
        self.capacity = 0;
        self.kind = ElementKind::Undefined;
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.storage.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.storage.iter_mut()
    }

    /// Doubles the logical capacity until `required` elements fit.
    ///
    /// The new capacity is only committed once the reservation succeeded.
    fn reserve_for(&mut self, required: usize) -> Result<()> {
        if required <= self.capacity {
            return Ok(());
        }

        let mut new_capacity = self.capacity.max(INITIAL_CAPACITY);
        while new_capacity < required {
            new_capacity *= 2;
        }

        self.storage
            .try_reserve_exact(new_capacity - self.storage.len())
            .map_err(|_| EngineError::AllocationFailed {
                requested: new_capacity,
            })?;

        log::debug!(
            "{:?} pool expanding capacity: {} -> {}",
            self.kind,
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<'a, T: PoolElement> IntoIterator for &'a TypedPool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
