//! Handle Registries
//!
//! A [`Registry`] layers the handle protocol on top of a [`TypedPool`]:
//!
//! 1. `generate` appends a value and stamps it with a 1-based id
//! 2. `use_id` selects an element by id (0 clears the selection)
//! 3. operate-on-current calls read or mutate the selected element
//! 4. `free` removes an element by id, `free_all` tears the pool down
//!
//! Ids live inside the elements. Lookups scan for the matching id field
//! instead of indexing by id, because removals compact the storage.
//!
//! # Id policies
//!
//! [`IdPolicy::LengthPlusOne`] assigns `len + 1`. After a `free`, the next
//! generated id can numerically collide with a freed id, or even with a
//! still-live one: with ids `1, 2, 3` live, freeing `2` and generating again
//! yields a second element with id `3`. Lookups then resolve to the first
//! match in storage order. [`IdPolicy::Monotonic`] uses a counter that never
//! hands out the same id twice.

use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{PoolElement, TypedPool};
use crate::errors::{EngineError, Result, SelectionKind};

/// Elements addressed by an embedded integer id.
pub trait Handled: PoolElement {
    /// Selection reported in [`EngineError::NotSet`] / [`EngineError::NotFound`].
    const SELECTION: SelectionKind;

    fn id(&self) -> u32;
    fn set_id(&mut self, id: u32);
}

/// Implements [`PoolElement`] and [`Handled`] for a struct with an `id: u32` field.
macro_rules! impl_handled {
    ($ty:ty, $kind:ident) => {
        impl $crate::pool::PoolElement for $ty {
            const KIND: $crate::pool::ElementKind = $crate::pool::ElementKind::$kind;
        }

        impl $crate::pool::Handled for $ty {
            const SELECTION: $crate::errors::SelectionKind = $crate::errors::SelectionKind::$kind;

            #[inline]
            fn id(&self) -> u32 {
                self.id
            }

            #[inline]
            fn set_id(&mut self, id: u32) {
                self.id = id;
            }
        }
    };
}

pub(crate) use impl_handled;

/// How a registry assigns ids to generated elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// `id = len + 1` at insertion time. Ids may be reused after a removal.
    #[default]
    LengthPlusOne,
    /// Strictly increasing ids, never reused within the registry's lifetime.
    Monotonic,
}

/// Object pool plus a "current selection", addressed by stable ids.
#[derive(Debug)]
pub struct Registry<T: Handled> {
    pool: TypedPool<T>,
    current: Option<u32>,
    policy: IdPolicy,
    last_id: u32,
    // id -> storage index, first match wins; rebuilt after every compaction
    index: Option<FxHashMap<u32, usize>>,
}

impl<T: Handled> Default for Registry<T> {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}

impl<T: Handled> Registry<T> {
    #[must_use]
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            pool: TypedPool::new(),
            current: None,
            policy,
            last_id: 0,
            index: None,
        }
    }

    /// Keeps an id -> index map instead of scanning on every lookup.
    #[must_use]
    pub fn with_indexed_lookup(mut self, enabled: bool) -> Self {
        self.index = enabled.then(FxHashMap::default);
        self.rebuild_index();
        self
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    #[inline]
    #[must_use]
    pub fn pool(&self) -> &TypedPool<T> {
        &self.pool
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Appends `value`, stamping it with a fresh id. The pool is initialized lazily.
    pub fn generate(&mut self, mut value: T) -> Result<u32> {
        self.pool.init()?;

        let id = match self.policy {
            IdPolicy::LengthPlusOne => self.pool.len() as u32 + 1,
            IdPolicy::Monotonic => self.last_id + 1,
        };
        value.set_id(id);
        self.pool.push_back(value)?;
        self.last_id = self.last_id.max(id);

        let position = self.pool.len() - 1;
        if let Some(index) = &mut self.index {
            index.entry(id).or_insert(position);
        }

        log::debug!("Generated {} {id}", T::SELECTION);
        Ok(id)
    }

    /// Generates `value`, then runs `setup` on the stored element. When `setup`
    /// fails the element is removed again and the error returned.
    pub fn generate_with(
        &mut self,
        value: T,
        setup: impl FnOnce(&mut T) -> Result<()>,
    ) -> Result<u32> {
        let id = self.generate(value)?;
        let position = self.pool.len() - 1;
        let Some(elem) = self.pool.get_mut(position) else {
            return Ok(id);
        };

        if let Err(err) = setup(elem) {
            self.pool.remove_range(position..position + 1)?;
            self.rebuild_index();
            log::debug!("Dropped {} {id} after failed setup", T::SELECTION);
            return Err(err);
        }
        Ok(id)
    }

    /// Selects the element with `id`. `0` clears the selection.
    pub fn use_id(&mut self, id: u32) -> Result<()> {
        if id == 0 {
            self.current = None;
            return Ok(());
        }

        let upper = match self.policy {
            IdPolicy::LengthPlusOne => self.pool.len() as u32,
            IdPolicy::Monotonic => self.last_id,
        };
        if id > upper {
            log::warn!("Rejected {} id {id}: outside [1, {upper}]", T::SELECTION);
            return Err(EngineError::invalid(format!(
                "{} id {id} outside [1, {upper}]",
                T::SELECTION
            )));
        }

        if self.position(id).is_none() {
            return Err(EngineError::NotFound {
                kind: T::SELECTION,
                id,
            });
        }

        self.current = Some(id);
        Ok(())
    }

    /// Id of the current selection, if any.
    #[inline]
    #[must_use]
    pub fn current_id(&self) -> Option<u32> {
        self.current
    }

    pub fn current(&self) -> Result<&T> {
        self.current
            .and_then(|id| self.get(id))
            .ok_or(EngineError::NotSet(T::SELECTION))
    }

    pub fn current_mut(&mut self) -> Result<&mut T> {
        let id = self.current.ok_or(EngineError::NotSet(T::SELECTION))?;
        self.get_mut(id).ok_or(EngineError::NotSet(T::SELECTION))
    }

    /// Storage index of the first element carrying `id`.
    #[must_use]
    pub fn position(&self, id: u32) -> Option<usize> {
        match &self.index {
            Some(index) => index.get(&id).copied(),
            None => self.pool.iter().position(|elem| elem.id() == id),
        }
    }

    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.position(id).and_then(|pos| self.pool.get(pos))
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.position(id).and_then(|pos| self.pool.get_mut(pos))
    }

    /// Like [`get`](Self::get) but reports a missing id as an error.
    pub fn try_get(&self, id: u32) -> Result<&T> {
        self.get(id).ok_or(EngineError::NotFound {
            kind: T::SELECTION,
            id,
        })
    }

    pub fn try_get_mut(&mut self, id: u32) -> Result<&mut T> {
        self.get_mut(id).ok_or(EngineError::NotFound {
            kind: T::SELECTION,
            id,
        })
    }

    /// Removes the element with `id` and returns it.
    ///
    /// Clears the selection if the removed element was current.
    pub fn free(&mut self, id: u32) -> Result<T> {
        let pos = self.position(id).ok_or(EngineError::NotFound {
            kind: T::SELECTION,
            id,
        })?;

        let mut removed = self.pool.remove_range(pos..pos + 1)?;
        if self.current == Some(id) {
            self.current = None;
        }
        self.rebuild_index();

        log::debug!("Freed {} {id}", T::SELECTION);
        removed.pop().ok_or(EngineError::InvalidPointer("free removed no element"))
    }

    /// Clears the selection and releases the whole pool. Returns the dropped elements.
    pub fn free_all(&mut self) -> Vec<T> {
        self.current = None;
        let removed = self
            .pool
            .remove_range(0..self.pool.len())
            .unwrap_or_default();
        self.pool.free();
        self.rebuild_index();
        removed
    }

    /// Selects `id` for the lifetime of the returned guard, then restores
    /// whatever was selected before.
    pub fn select_scoped(&mut self, id: u32) -> Result<SelectionScope<'_, T>> {
        let previous = self.current;
        self.use_id(id)?;
        Ok(SelectionScope {
            registry: self,
            previous,
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.pool.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.pool.iter_mut()
    }

    /// Ids of every live element in storage order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.pool.iter().map(Handled::id)
    }

    fn rebuild_index(&mut self) {
        if let Some(index) = &mut self.index {
            index.clear();
            for (position, elem) in self.pool.iter().enumerate() {
                index.entry(elem.id()).or_insert(position);
            }
        }
    }
}

/// Guard returned by [`Registry::select_scoped`].
///
/// Dereferences to the registry; on drop the previous selection is restored
/// unless that element was freed while the guard was alive.
pub struct SelectionScope<'a, T: Handled> {
    registry: &'a mut Registry<T>,
    previous: Option<u32>,
}

impl<T: Handled> Deref for SelectionScope<'_, T> {
    type Target = Registry<T>;

    fn deref(&self) -> &Self::Target {
        self.registry
    }
}

impl<T: Handled> DerefMut for SelectionScope<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registry
    }
}

impl<T: Handled> Drop for SelectionScope<'_, T> {
    fn drop(&mut self) {
        self.registry.current = self.previous.filter(|&id| self.registry.contains(id));
    }
}
