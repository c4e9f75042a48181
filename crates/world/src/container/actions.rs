use super::kind::SwapTarget;
use super::transaction::ContainerTransaction;

/// Wire-level description of a committed click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    /// Clicked slot.
    pub slot: Option<usize>,
    /// Click mode.
    pub mode: u8,
    /// Button or key.
    pub button: u8,
}

/// A player interaction with a container.
///
/// `click` stages its changes on the transaction and describes the packet to
/// send. Returning `None` rejects the click; staged changes are then dropped.
pub trait ContainerAction {
    /// Stage the click.
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click>;
}

/// Left (all) or right (part) mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickCount {
    /// Whole stack.
    All,
    /// Half when picking, one when putting.
    Part,
}

impl ClickCount {
    fn button(self) -> u8 {
        match self {
            ClickCount::All => 0,
            ClickCount::Part => 1,
        }
    }
}

/// Plain pick up / put down click (mode 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleContainerAction {
    /// Target slot, `None` for clicks outside the window.
    pub slot: Option<usize>,
    /// Mouse button.
    pub count: ClickCount,
}

impl SimpleContainerAction {
    /// Click `slot` with `count`.
    pub fn new(slot: Option<usize>, count: ClickCount) -> Self {
        Self { slot, count }
    }

    fn pick(&self, transaction: &mut ContainerTransaction<'_>) -> Option<()> {
        let slot = self.slot?;
        let item = transaction.get(slot)?.clone();
        if !transaction.slot_type(slot)?.can_remove(&item) {
            return None;
        }
        match self.count {
            ClickCount::All => {
                transaction.set(slot, None);
                transaction.set_floating(Some(item));
            }
            ClickCount::Part => {
                let stay = item.count / 2;
                transaction.set(slot, Some(item.with_count(stay)));
                transaction.set_floating(Some(item.with_count(item.count - stay)));
            }
        }
        Some(())
    }

    fn put(&self, transaction: &mut ContainerTransaction<'_>) -> Option<()> {
        let mut floating = transaction.floating()?.clone();
        let Some(slot) = self.slot else {
            // Outside the window: the items are dropped.
            match self.count {
                ClickCount::All => floating.count = 0,
                ClickCount::Part => floating.count -= 1,
            }
            transaction.set_floating(Some(floating));
            return Some(());
        };
        let slot_type = transaction.slot_type(slot)?;
        let target = transaction.get(slot).cloned();
        let matches = target
            .as_ref()
            .is_some_and(|target| floating.matches(target));

        if let Some(mut target) = target.clone().filter(|_| matches) {
            if slot_type.can_put(&floating) {
                let max = slot_type.max_stack_size(&target);
                let amount = match self.count {
                    ClickCount::All => max.saturating_sub(target.count).min(floating.count),
                    ClickCount::Part => 1,
                };
                if amount == 0 || target.count + amount > max {
                    return None;
                }
                target.count += amount;
                floating.count -= amount;
            } else if slot_type.can_remove(&floating) {
                let amount = floating.remaining_space().min(target.count);
                if amount == 0 {
                    return None;
                }
                target.count -= amount;
                floating.count += amount;
            } else {
                return None;
            }
            transaction.set(slot, Some(target));
            transaction.set_floating(Some(floating));
            return Some(());
        }

        if let Some(target) = &target {
            if !slot_type.can_remove(target) {
                return None;
            }
        }
        if !slot_type.can_put(&floating) {
            return None;
        }
        if self.count == ClickCount::All || target.is_some() {
            transaction.set_floating(target);
            transaction.set(slot, Some(floating));
        } else {
            transaction.set(slot, Some(floating.with_count(1)));
            floating.count -= 1;
            transaction.set_floating(Some(floating));
        }
        Some(())
    }
}

impl ContainerAction for SimpleContainerAction {
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click> {
        if transaction.floating().is_some() {
            self.put(transaction)?;
        } else {
            self.pick(transaction)?;
        }
        Some(Click {
            slot: self.slot,
            mode: 0,
            button: self.count.button(),
        })
    }
}

/// Shift click (mode 1): moves a stack into the opposite section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastMoveContainerAction {
    /// Source slot.
    pub slot: usize,
}

impl FastMoveContainerAction {
    /// Shift click `slot`.
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }
}

impl ContainerAction for FastMoveContainerAction {
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click> {
        let source = transaction.get(self.slot)?.clone();
        if !transaction.slot_type(self.slot)?.can_remove(&source) {
            return None;
        }
        let order: Vec<usize> = transaction
            .kind()
            .fast_move_targets(self.slot)
            .iter()
            .flat_map(|section| section.iter().collect::<Vec<_>>())
            .filter(|slot| *slot != self.slot)
            .collect();

        let mut remaining = source.count;
        // Top up matching stacks first, then spill into empty slots.
        for &slot in &order {
            if remaining == 0 {
                break;
            }
            let Some(existing) = transaction.get(slot) else {
                continue;
            };
            let Some(slot_type) = transaction.slot_type(slot) else {
                continue;
            };
            if !existing.matches(&source) || !slot_type.can_put(&source) {
                continue;
            }
            let space = slot_type
                .max_stack_size(existing)
                .saturating_sub(existing.count);
            let moved = space.min(remaining);
            if moved == 0 {
                continue;
            }
            let merged = existing.with_count(existing.count + moved);
            transaction.set(slot, Some(merged));
            remaining -= moved;
        }
        for &slot in &order {
            if remaining == 0 {
                break;
            }
            if transaction.get(slot).is_some() {
                continue;
            }
            let Some(slot_type) = transaction.slot_type(slot) else {
                continue;
            };
            if !slot_type.can_put(&source) {
                continue;
            }
            let moved = remaining.min(slot_type.max_stack_size(&source));
            transaction.set(slot, Some(source.with_count(moved)));
            remaining -= moved;
        }

        if remaining == source.count {
            return None;
        }
        transaction.set(self.slot, Some(source.with_count(remaining)));
        Some(Click {
            slot: Some(self.slot),
            mode: 1,
            button: 0,
        })
    }
}

/// Number key or swap-hands click (mode 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSwapContainerAction {
    /// Hovered slot.
    pub slot: usize,
    /// Hotbar or offhand slot to swap with.
    pub target: SwapTarget,
}

impl SlotSwapContainerAction {
    /// Swap `slot` with `target`.
    pub fn new(slot: usize, target: SwapTarget) -> Self {
        Self { slot, target }
    }
}

impl ContainerAction for SlotSwapContainerAction {
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click> {
        let target_slot = transaction.kind().swap_slot(self.target)?;
        if target_slot == self.slot {
            return None;
        }
        let source = transaction.get(self.slot).cloned();
        let target = transaction.get(target_slot).cloned();
        if source.is_none() && target.is_none() {
            return None;
        }
        let source_type = transaction.slot_type(self.slot)?;
        let target_type = transaction.slot_type(target_slot)?;
        if let Some(stack) = &source {
            if !source_type.can_remove(stack) || !target_type.can_put(stack) {
                return None;
            }
        }
        if let Some(stack) = &target {
            if !target_type.can_remove(stack) || !source_type.can_put(stack) {
                return None;
            }
        }
        transaction.set(self.slot, target);
        transaction.set(target_slot, source);
        Some(Click {
            slot: Some(self.slot),
            mode: 2,
            button: self.target.button(),
        })
    }
}

/// Middle click in creative mode (mode 3): a full stack copy on the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneContainerAction {
    /// Source slot.
    pub slot: usize,
}

impl CloneContainerAction {
    /// Clone the stack in `slot`.
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }
}

impl ContainerAction for CloneContainerAction {
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click> {
        if !transaction.is_creative() || transaction.floating().is_some() {
            return None;
        }
        let stack = transaction.get(self.slot)?;
        let clone = stack.with_count(stack.max_stack_size());
        transaction.set_floating(Some(clone));
        Some(Click {
            slot: Some(self.slot),
            mode: 3,
            button: 2,
        })
    }
}

/// Drop key over a slot (mode 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropContainerAction {
    /// Source slot.
    pub slot: usize,
    /// Drop the whole stack instead of a single item.
    pub stack: bool,
}

impl DropContainerAction {
    /// Drop from `slot`.
    pub fn new(slot: usize, stack: bool) -> Self {
        Self { slot, stack }
    }
}

impl ContainerAction for DropContainerAction {
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click> {
        if transaction.floating().is_some() {
            return None;
        }
        let item = transaction.get(self.slot)?.clone();
        if !transaction.slot_type(self.slot)?.can_remove(&item) {
            return None;
        }
        let left = if self.stack { 0 } else { item.count - 1 };
        transaction.set(self.slot, Some(item.with_count(left)));
        Some(Click {
            slot: Some(self.slot),
            mode: 4,
            button: u8::from(self.stack),
        })
    }
}

/// Double click (mode 6): gathers matching items onto the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickAllContainerAction {
    /// Clicked slot.
    pub slot: usize,
}

impl PickAllContainerAction {
    /// Double click `slot`.
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }
}

impl ContainerAction for PickAllContainerAction {
    fn click(&self, transaction: &mut ContainerTransaction<'_>) -> Option<Click> {
        let mut floating = transaction.floating()?.clone();
        let max = floating.max_stack_size();
        let before = floating.count;
        for slot in transaction.occupied_slots() {
            if floating.count >= max {
                break;
            }
            let Some(stack) = transaction.get(slot).cloned() else {
                continue;
            };
            if !stack.matches(&floating) {
                continue;
            }
            if !transaction
                .slot_type(slot)
                .is_some_and(|slot_type| slot_type.can_remove(&stack))
            {
                continue;
            }
            let taken = (max - floating.count).min(stack.count);
            transaction.set(slot, Some(stack.with_count(stack.count - taken)));
            floating.count += taken;
        }
        if floating.count == before {
            return None;
        }
        transaction.set_floating(Some(floating));
        Some(Click {
            slot: Some(self.slot),
            mode: 6,
            button: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use minemesh_core::Identifier;

    use super::super::{Container, ContainerKind, EquipmentSlot, Item, ItemStack};
    use super::*;

    fn stack(name: &str, count: u32) -> ItemStack {
        ItemStack::new(Arc::new(Item::new(Identifier::minecraft(name))), count)
    }

    fn chest() -> Container {
        Container::new(9, ContainerKind::Chest { rows: 3 })
    }

    #[test]
    fn pick_part_leaves_the_smaller_half() {
        let mut container = chest();
        container.set(3, Some(stack("apple", 9)));
        let mut sent = Vec::new();
        let action = SimpleContainerAction::new(Some(3), ClickCount::Part);
        assert_eq!(container.invoke(&action, &mut sent), Some(0));
        assert_eq!(container.get(3).map(|s| s.count), Some(4));
        assert_eq!(container.floating().map(|s| s.count), Some(5));
        assert_eq!(sent[0].button, 1);
    }

    #[test]
    fn rejected_click_stages_nothing() {
        let mut container = chest();
        let mut transaction = container.transaction();
        let click = SimpleContainerAction::new(Some(0), ClickCount::All).click(&mut transaction);
        assert!(click.is_none());
        assert!(transaction.is_empty());
    }

    #[test]
    fn swap_refuses_non_armor_into_armor_slot() {
        let mut container = Container::new(0, ContainerKind::PlayerInventory);
        container.set(36, Some(stack("apple", 1)));
        let mut sent = Vec::new();
        let action = SlotSwapContainerAction::new(5, SwapTarget::Hotbar(0));
        assert!(container.invoke(&action, &mut sent).is_none());

        let helmet = Item::new(Identifier::minecraft("iron_helmet"))
            .with_equipment(EquipmentSlot::Head);
        container.set(36, Some(ItemStack::new(Arc::new(helmet), 1)));
        assert!(container.invoke(&action, &mut sent).is_some());
        assert!(container.get(36).is_none());
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].button, 0);
    }

    #[test]
    fn clone_requires_creative() {
        let mut container = chest();
        container.set(1, Some(stack("coal", 2)));
        let mut sent = Vec::new();
        assert!(container.invoke(&CloneContainerAction::new(1), &mut sent).is_none());
        container.set_creative(true);
        assert!(container.invoke(&CloneContainerAction::new(1), &mut sent).is_some());
        assert_eq!(container.floating().map(|s| s.count), Some(64));
        assert_eq!(container.get(1).map(|s| s.count), Some(2));
        assert_eq!((sent[0].mode, sent[0].button), (3, 2));
    }

    #[test]
    fn drop_single_and_stack() {
        let mut container = chest();
        container.set(2, Some(stack("coal", 5)));
        let mut sent = Vec::new();
        container.invoke(&DropContainerAction::new(2, false), &mut sent);
        assert_eq!(container.get(2).map(|s| s.count), Some(4));
        container.invoke(&DropContainerAction::new(2, true), &mut sent);
        assert!(container.get(2).is_none());
        assert_eq!(sent[1].changes.get(&2), Some(&None));
        assert_eq!((sent[1].mode, sent[1].button), (4, 1));
    }
}
