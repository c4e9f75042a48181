use std::ops::Range;

use super::slot::{ArmorSlot, DefaultSlot, EquipmentSlot, RemoveOnlySlot, SlotType};

static DEFAULT: DefaultSlot = DefaultSlot;
static REMOVE_ONLY: RemoveOnlySlot = RemoveOnlySlot;
static ARMOR: [ArmorSlot; 4] = [
    ArmorSlot(EquipmentSlot::Head),
    ArmorSlot(EquipmentSlot::Chest),
    ArmorSlot(EquipmentSlot::Legs),
    ArmorSlot(EquipmentSlot::Feet),
];

/// Slots of the player's main inventory appended to every other container.
const PLAYER_SLOTS: usize = 36;
const HOTBAR_SLOTS: usize = 9;

/// Hotbar or offhand slot targeted by a number-key / swap-hands click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapTarget {
    /// Hotbar slot `0..9`.
    Hotbar(u8),
    /// The offhand.
    Offhand,
}

impl SwapTarget {
    /// Click button sent on the wire.
    pub fn button(self) -> u8 {
        match self {
            SwapTarget::Hotbar(index) => index,
            SwapTarget::Offhand => 40,
        }
    }
}

/// Slot range targeted by a fast move, with its fill order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSection {
    /// Slots in the section.
    pub slots: Range<usize>,
    /// Fill from the last slot towards the first.
    pub reversed: bool,
}

impl ContainerSection {
    fn forward(slots: Range<usize>) -> Self {
        Self {
            slots,
            reversed: false,
        }
    }

    fn reversed(slots: Range<usize>) -> Self {
        Self {
            slots,
            reversed: true,
        }
    }

    /// Slots in fill order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        if self.reversed {
            Box::new(self.slots.clone().rev())
        } else {
            Box::new(self.slots.clone())
        }
    }
}

/// Slot layout of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Flat list of default slots without fast-move targets.
    Generic {
        /// Slot count.
        size: usize,
    },
    /// `rows` × 9 chest slots followed by the player's inventory and hotbar.
    Chest {
        /// Chest rows.
        rows: usize,
    },
    /// The player's own inventory window.
    PlayerInventory,
}

impl ContainerKind {
    /// Crafting result slot of the player inventory.
    pub const CRAFTING_RESULT: usize = 0;
    /// First armor slot of the player inventory.
    pub const ARMOR_OFFSET: usize = 5;
    /// First main inventory slot of the player inventory.
    pub const MAIN_OFFSET: usize = 9;
    /// First hotbar slot of the player inventory.
    pub const HOTBAR_OFFSET: usize = 36;
    /// Offhand slot of the player inventory.
    pub const OFFHAND: usize = 45;

    /// Number of slots.
    pub fn size(self) -> usize {
        match self {
            ContainerKind::Generic { size } => size,
            ContainerKind::Chest { rows } => rows * 9 + PLAYER_SLOTS,
            ContainerKind::PlayerInventory => Self::OFFHAND + 1,
        }
    }

    /// Rules for a slot, `None` outside the layout.
    pub fn slot_type(self, slot: usize) -> Option<&'static dyn SlotType> {
        if slot >= self.size() {
            return None;
        }
        let slot_type: &'static dyn SlotType = match (self, slot) {
            (ContainerKind::PlayerInventory, Self::CRAFTING_RESULT) => &REMOVE_ONLY,
            (ContainerKind::PlayerInventory, 5..=8) => &ARMOR[slot - Self::ARMOR_OFFSET],
            _ => &DEFAULT,
        };
        Some(slot_type)
    }

    /// Sections a fast move out of `slot` fills, in priority order.
    pub fn fast_move_targets(self, slot: usize) -> Vec<ContainerSection> {
        match self {
            ContainerKind::Generic { .. } => Vec::new(),
            ContainerKind::Chest { rows } => {
                let chest = rows * 9;
                if slot < chest {
                    vec![ContainerSection::reversed(chest..chest + PLAYER_SLOTS)]
                } else if slot < chest + PLAYER_SLOTS {
                    vec![ContainerSection::forward(0..chest)]
                } else {
                    Vec::new()
                }
            }
            ContainerKind::PlayerInventory => match slot {
                Self::CRAFTING_RESULT => {
                    vec![ContainerSection::reversed(Self::MAIN_OFFSET..Self::OFFHAND)]
                }
                1..=8 | Self::OFFHAND => {
                    vec![ContainerSection::forward(Self::MAIN_OFFSET..Self::OFFHAND)]
                }
                9..=35 => vec![ContainerSection::forward(
                    Self::HOTBAR_OFFSET..Self::HOTBAR_OFFSET + HOTBAR_SLOTS,
                )],
                36..=44 => vec![ContainerSection::forward(
                    Self::MAIN_OFFSET..Self::HOTBAR_OFFSET,
                )],
                _ => Vec::new(),
            },
        }
    }

    /// Container slot addressed by a swap target.
    pub fn swap_slot(self, target: SwapTarget) -> Option<usize> {
        let hotbar = match self {
            ContainerKind::Generic { .. } => return None,
            ContainerKind::Chest { rows } => rows * 9 + PLAYER_SLOTS - HOTBAR_SLOTS,
            ContainerKind::PlayerInventory => Self::HOTBAR_OFFSET,
        };
        match target {
            SwapTarget::Hotbar(index) if (index as usize) < HOTBAR_SLOTS => {
                Some(hotbar + index as usize)
            }
            SwapTarget::Hotbar(_) => None,
            SwapTarget::Offhand => {
                (self == ContainerKind::PlayerInventory).then_some(Self::OFFHAND)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chest_layout_appends_player_slots() {
        let chest = ContainerKind::Chest { rows: 3 };
        assert_eq!(chest.size(), 63);
        assert_eq!(
            chest.fast_move_targets(0),
            vec![ContainerSection::reversed(27..63)]
        );
        assert_eq!(chest.fast_move_targets(54), vec![ContainerSection::forward(0..27)]);
        assert_eq!(chest.swap_slot(SwapTarget::Hotbar(0)), Some(54));
        assert_eq!(chest.swap_slot(SwapTarget::Offhand), None);
        assert!(chest.slot_type(63).is_none());
    }

    #[test]
    fn player_inventory_slot_rules() {
        let inventory = ContainerKind::PlayerInventory;
        assert_eq!(inventory.size(), 46);
        assert_eq!(inventory.swap_slot(SwapTarget::Hotbar(8)), Some(44));
        assert_eq!(inventory.swap_slot(SwapTarget::Offhand), Some(45));
        assert_eq!(inventory.swap_slot(SwapTarget::Hotbar(9)), None);
        assert_eq!(
            inventory.fast_move_targets(20),
            vec![ContainerSection::forward(36..45)]
        );
        assert!(inventory.fast_move_targets(0)[0].reversed);
        assert_eq!(
            ContainerSection::reversed(2..5).iter().collect::<Vec<_>>(),
            vec![4, 3, 2]
        );
    }
}
