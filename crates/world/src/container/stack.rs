use std::fmt;
use std::sync::Arc;

use minemesh_core::Identifier;

use super::slot::EquipmentSlot;

/// Maximum stack size for most items.
pub const DEFAULT_STACK_SIZE: u32 = 64;

/// An item type.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    identifier: Identifier,
    max_stack_size: u32,
    equipment: Option<EquipmentSlot>,
}

impl Item {
    /// Item that stacks up to [`DEFAULT_STACK_SIZE`].
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            max_stack_size: DEFAULT_STACK_SIZE,
            equipment: None,
        }
    }

    /// Override the stack size.
    pub fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size.max(1);
        self
    }

    /// Mark the item as wearable in an armor slot. Wearables do not stack.
    pub fn with_equipment(mut self, slot: EquipmentSlot) -> Self {
        self.equipment = Some(slot);
        self.max_stack_size = 1;
        self
    }

    /// Registry name.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Largest count a single stack may hold.
    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    /// Armor slot the item fits in.
    pub fn equipment(&self) -> Option<EquipmentSlot> {
        self.equipment
    }
}

/// Represents a stack of items in a container slot.
#[derive(Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Item type.
    pub item: Arc<Item>,
    /// Number of items in this stack.
    pub count: u32,
    /// Optional item metadata (damage, enchantments, names).
    pub metadata: Option<Vec<u8>>,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: Arc<Item>, count: u32) -> Self {
        Self {
            item,
            count,
            metadata: None,
        }
    }

    /// Create an item stack with metadata.
    pub fn with_metadata(item: Arc<Item>, count: u32, metadata: Vec<u8>) -> Self {
        Self {
            item,
            count,
            metadata: Some(metadata),
        }
    }

    /// Same item and metadata with a different count.
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            item: self.item.clone(),
            count,
            metadata: self.metadata.clone(),
        }
    }

    /// True if the stack holds nothing.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if both stacks hold the same item with the same metadata.
    pub fn matches(&self, other: &ItemStack) -> bool {
        self.item.identifier == other.item.identifier && self.metadata == other.metadata
    }

    /// Maximum stack size of the item.
    pub fn max_stack_size(&self) -> u32 {
        self.item.max_stack_size
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size()
    }

    /// Remaining space in this stack.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack_size().saturating_sub(self.count)
    }

    /// Add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }

    /// Remove items from this stack, returning the amount actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }

    /// Split off `amount` items into a new stack.
    pub fn split(&mut self, amount: u32) -> Option<ItemStack> {
        if amount == 0 || amount > self.count {
            return None;
        }
        self.count -= amount;
        Some(self.with_count(amount))
    }

    /// `Some(self)` unless the stack is empty.
    pub fn non_empty(self) -> Option<ItemStack> {
        (!self.is_empty()).then_some(self)
    }
}

impl fmt::Debug for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.count, self.item.identifier)?;
        if let Some(metadata) = &self.metadata {
            write!(f, "{metadata:?}")?;
        }
        Ok(())
    }
}
