//! Sparse-set storage for one component type.
//!
//! A [`ComponentPool`] keeps three parallel structures:
//!
//! - `entities[slot]`: the entity *index* owning dense slot `slot`.
//! - `data`: raw component bytes, `item_size` bytes per slot, packed.
//! - `sparse[index]`: the dense slot owned by entity `index`, or empty.
//!
//! For every stored pair, `sparse[index] == slot` and
//! `entities[slot] == index`. All mutation goes through [`ComponentPool::push`]
//! and [`ComponentPool::swap_remove`], which keep that mirror intact.

use bytemuck::{Pod, Zeroable};

use crate::component::ComponentTypeId;

/// Largest component alignment a pool can hand out references for.
pub const MAX_COMPONENT_ALIGN: usize = 16;

/// Sparse entry for "no component".
const EMPTY: u32 = u32::MAX;

/// Backing unit of the dense byte array. Its alignment is what lets typed
/// views cast slot bytes back to `&T`.
#[derive(Debug, Clone, Copy)]
#[repr(C, align(16))]
struct Block([u8; MAX_COMPONENT_ALIGN]);

// SAFETY: `Block` is a `repr(C)` wrapper around a byte array whose size equals
// its alignment, so it has no padding and every bit pattern is valid.
unsafe impl Zeroable for Block {}
// SAFETY: see above.
unsafe impl Pod for Block {}

/// Dense/sparse storage of one component type's raw bytes.
#[derive(Debug, Clone)]
pub struct ComponentPool {
    type_id: ComponentTypeId,
    item_size: usize,
    sparse: Vec<u32>,
    entities: Vec<u32>,
    data: Vec<Block>,
}

impl ComponentPool {
    /// Create an empty pool whose sparse array already covers `capacity`
    /// entity slots.
    #[must_use]
    pub fn new(type_id: ComponentTypeId, item_size: usize, capacity: usize) -> Self {
        Self {
            type_id,
            item_size,
            sparse: vec![EMPTY; capacity],
            entities: Vec::new(),
            data: Vec::new(),
        }
    }

    /// The component type stored in this pool.
    #[must_use]
    pub fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    /// Size of one component in bytes.
    #[must_use]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the pool stores no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entity slots the sparse array covers.
    #[must_use]
    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    /// Extend the sparse array to cover `capacity` entity slots. Never shrinks.
    pub fn grow_sparse(&mut self, capacity: usize) {
        if capacity > self.sparse.len() {
            self.sparse.resize(capacity, EMPTY);
        }
    }

    /// Dense slot of the component owned by entity `index`.
    ///
    /// Checks both directions of the sparse/dense mirror, so a stale sparse
    /// entry never resolves to another entity's component.
    #[must_use]
    pub fn slot_of(&self, index: u32) -> Option<usize> {
        let slot = *self.sparse.get(index as usize)?;
        if slot == EMPTY {
            return None;
        }
        let slot = slot as usize;
        (self.entities.get(slot) == Some(&index)).then_some(slot)
    }

    /// Returns `true` if entity `index` has a component in this pool.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.slot_of(index).is_some()
    }

    /// Entity index owning dense slot `slot`.
    #[must_use]
    pub fn entity_index_at(&self, slot: usize) -> Option<u32> {
        self.entities.get(slot).copied()
    }

    /// Owning entity indices in dense order.
    #[must_use]
    pub fn entity_indices(&self) -> &[u32] {
        &self.entities
    }

    /// All component bytes in dense order, `len() * item_size()` long.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&self.data);
        &bytes[..self.entities.len() * self.item_size]
    }

    /// Bytes of the component in dense slot `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&[u8]> {
        if slot >= self.entities.len() {
            return None;
        }
        let start = slot * self.item_size;
        let bytes: &[u8] = bytemuck::cast_slice(&self.data);
        Some(&bytes[start..start + self.item_size])
    }

    /// Mutable bytes of the component in dense slot `slot`.
    #[must_use]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut [u8]> {
        if slot >= self.entities.len() {
            return None;
        }
        let start = slot * self.item_size;
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.data);
        Some(&mut bytes[start..start + self.item_size])
    }

    /// Append a zeroed component for entity `index` and return its slot.
    ///
    /// The caller must have checked that `index` has no component here yet.
    pub fn push(&mut self, index: u32) -> usize {
        debug_assert!(!self.contains(index), "entity {index} already in pool");
        self.grow_sparse(index as usize + 1);

        let slot = self.entities.len();
        let start = slot * self.item_size;
        let end = start + self.item_size;
        let blocks = end.div_ceil(MAX_COMPONENT_ALIGN);
        if self.data.len() < blocks {
            self.data.resize(blocks, Block::zeroed());
        }
        // A partially used tail block may still hold bytes of a removed slot.
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.data);
        bytes[start..end].fill(0);

        self.entities.push(index);
        self.sparse[index as usize] = slot as u32;
        slot
    }

    /// Detach entity `index`'s component by moving the last dense slot into
    /// its place.
    ///
    /// Returns `false` if the entity has no component in this pool. This is
    /// the only removal path; explicit removes and entity destruction both
    /// go through it.
    pub fn swap_remove(&mut self, index: u32) -> bool {
        let Some(slot) = self.slot_of(index) else {
            return false;
        };
        let last = self.entities.len() - 1;
        let size = self.item_size;

        if slot != last {
            let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.data);
            bytes.copy_within(last * size..(last + 1) * size, slot * size);
            let moved = self.entities[last];
            self.entities[slot] = moved;
            self.sparse[moved as usize] = slot as u32;
        }

        self.entities.truncate(last);
        self.sparse[index as usize] = EMPTY;
        self.data.truncate((last * size).div_ceil(MAX_COMPONENT_ALIGN));

        debug_assert!(
            slot == last || self.slot_of(self.entities[slot]) == Some(slot),
            "sparse/dense mirror broken after swap removal"
        );
        true
    }

    /// Drop every component, keeping the sparse array's size.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.data.clear();
        self.sparse.fill(EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(indices: &[u32], size: usize) -> ComponentPool {
        let mut pool = ComponentPool::new(ComponentTypeId(1), size, 4);
        for &index in indices {
            let slot = pool.push(index);
            pool.get_mut(slot).unwrap().fill(index as u8 + 1);
        }
        pool
    }

    #[test]
    fn test_push_and_get() {
        let pool = pool_with(&[3, 0], 6);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.slot_of(3), Some(0));
        assert_eq!(pool.slot_of(0), Some(1));
        assert_eq!(pool.get(0).unwrap(), &[4u8; 6]);
        assert_eq!(pool.get(1).unwrap(), &[1u8; 6]);
        assert_eq!(pool.bytes().len(), 12);
        assert!(pool.get(2).is_none());
    }

    #[test]
    fn test_push_grows_sparse() {
        let mut pool = ComponentPool::new(ComponentTypeId(1), 4, 2);
        pool.push(10);
        assert_eq!(pool.sparse_len(), 11);
        assert!(pool.contains(10));
        assert!(!pool.contains(5));
        assert!(!pool.contains(100));
    }

    #[test]
    fn test_swap_remove_moves_last_slot() {
        let mut pool = pool_with(&[0, 1, 2], 4);
        assert!(pool.swap_remove(0));

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entity_index_at(0), Some(2));
        assert_eq!(pool.slot_of(2), Some(0));
        assert_eq!(pool.get(0).unwrap(), &[3u8; 4]);
        assert!(!pool.contains(0));
        assert_eq!(pool.slot_of(1), Some(1));
    }

    #[test]
    fn test_swap_remove_last_slot() {
        let mut pool = pool_with(&[0, 1], 4);
        assert!(pool.swap_remove(1));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.slot_of(0), Some(0));
        assert!(!pool.swap_remove(1));
    }

    #[test]
    fn test_reused_slot_is_zeroed() {
        let mut pool = pool_with(&[0, 1, 2], 5);
        pool.swap_remove(2);
        let slot = pool.push(3);
        assert_eq!(pool.get(slot).unwrap(), &[0u8; 5]);
    }

    #[test]
    fn test_clear_keeps_sparse_size() {
        let mut pool = pool_with(&[0, 3], 4);
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.sparse_len(), 4);
        assert!(!pool.contains(3));
        assert!(pool.bytes().is_empty());
    }

    #[test]
    fn test_slots_are_aligned() {
        let mut pool = ComponentPool::new(ComponentTypeId(1), 16, 0);
        for index in 0..4 {
            let slot = pool.push(index);
            let ptr = pool.get(slot).unwrap().as_ptr();
            assert_eq!(ptr as usize % MAX_COMPONENT_ALIGN, 0);
        }
    }
}
