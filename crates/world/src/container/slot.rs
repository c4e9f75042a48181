use serde::{Deserialize, Serialize};

use super::stack::ItemStack;

/// Armor slot of an equippable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    /// Helmets.
    Head,
    /// Chestplates and elytra.
    Chest,
    /// Leggings.
    Legs,
    /// Boots.
    Feet,
}

/// Rules for what a slot accepts and gives back.
pub trait SlotType: Send + Sync {
    /// True if `stack` may be placed into the slot.
    fn can_put(&self, stack: &ItemStack) -> bool {
        let _ = stack;
        true
    }

    /// True if `stack` may be taken out of the slot.
    fn can_remove(&self, stack: &ItemStack) -> bool {
        let _ = stack;
        true
    }

    /// Largest count the slot holds of `stack`.
    fn max_stack_size(&self, stack: &ItemStack) -> u32 {
        stack.max_stack_size()
    }
}

/// Accepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSlot;

impl SlotType for DefaultSlot {}

/// Output slots like the crafting result: items can only be taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOnlySlot;

impl SlotType for RemoveOnlySlot {
    fn can_put(&self, _stack: &ItemStack) -> bool {
        false
    }
}

/// Armor slot accepting only items for its equipment slot.
#[derive(Debug, Clone, Copy)]
pub struct ArmorSlot(pub EquipmentSlot);

impl SlotType for ArmorSlot {
    fn can_put(&self, stack: &ItemStack) -> bool {
        stack.item.equipment() == Some(self.0)
    }

    fn max_stack_size(&self, _stack: &ItemStack) -> u32 {
        1
    }
}
