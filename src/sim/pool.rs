//! Object pools with stable slots and tombstoning
//!
//! Removing an object empties its slot in place; nothing is compacted, so the
//! indices of other objects stay put. Inserting fills the first empty slot
//! before growing. Each slot carries a generation that is bumped on removal,
//! which lets a [`Handle`] detect that its object is gone even after the slot
//! was reused.

use serde::{Deserialize, Serialize};

/// Generation-stamped reference to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index (not stable across insert/remove churn)
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Flat collection of optional objects
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Place `value` in the first empty slot, or append if there is none
    pub fn insert(&mut self, value: T) -> Handle {
        if let Some(index) = self.slots.iter().position(|s| s.value.is_none()) {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return Handle {
                index: index as u32,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Tombstone a slot, returning what was there.
    ///
    /// Removing an already-empty slot is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        let value = slot.value.take();
        if value.is_some() {
            slot.generation = slot.generation.wrapping_add(1);
        }
        value
    }

    /// Tombstone the slot a handle points at, if the handle is still current
    pub fn remove_handle(&mut self, handle: Handle) -> Option<T> {
        if self.get(handle).is_none() {
            return None;
        }
        self.remove(handle.index())
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Current occupant of a slot, ignoring generations
    pub fn slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|s| s.value.as_ref())
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(|s| s.value.as_mut())
    }

    /// Handle for the current occupant of a slot
    pub fn handle_at(&self, index: usize) -> Option<Handle> {
        let slot = self.slots.get(index)?;
        slot.value.as_ref().map(|_| Handle {
            index: index as u32,
            generation: slot.generation,
        })
    }

    /// Mutable access to two distinct live slots at once
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return None;
        }

        let (first, second) = if a < b {
            let (lo, hi) = self.slots.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        };

        match (first.value.as_mut(), second.value.as_mut()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Number of slots, live or tombstoned
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupied slots
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    /// Live objects with their slot index, in pool order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.value.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.value.as_mut().map(|v| (i, v)))
    }

    /// Tombstone every live object matching `pred`, returning how many were removed
    pub fn tombstone_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.value.as_ref().is_some_and(&mut pred) {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                removed += 1;
            }
        }
        removed
    }

    /// Empty every slot (slots themselves are kept for reuse)
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
    }
}

/// Insert into a pool and return the slot index used
pub fn insert_into_pool<T>(pool: &mut Pool<T>, value: T) -> usize {
    pool.insert(value).index()
}
