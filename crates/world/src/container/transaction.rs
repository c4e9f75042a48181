use std::collections::BTreeMap;

use super::kind::ContainerKind;
use super::slot::SlotType;
use super::stack::ItemStack;
use super::Container;

/// Slot and cursor state captured before a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RevertState {
    pub(crate) slots: BTreeMap<usize, Option<ItemStack>>,
    pub(crate) floating: Option<ItemStack>,
}

/// Result of [`ContainerTransaction::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTransaction {
    /// Action id allocated for the commit.
    pub action_id: i32,
    /// Slots written by the transaction, with their new contents.
    pub changes: BTreeMap<usize, Option<ItemStack>>,
    /// Cursor item after the commit.
    pub floating: Option<ItemStack>,
}

/// Staged slot and cursor changes. Nothing is visible on the container until
/// [`commit`](Self::commit); dropping the transaction discards everything.
pub struct ContainerTransaction<'a> {
    container: &'a mut Container,
    changes: BTreeMap<usize, Option<ItemStack>>,
    floating: Option<Option<ItemStack>>,
}

impl<'a> ContainerTransaction<'a> {
    pub(crate) fn new(container: &'a mut Container) -> Self {
        Self {
            container,
            changes: BTreeMap::new(),
            floating: None,
        }
    }

    /// Layout of the container.
    pub fn kind(&self) -> ContainerKind {
        self.container.kind()
    }

    /// True if the session may clone items.
    pub fn is_creative(&self) -> bool {
        self.container.is_creative()
    }

    /// Rules for a slot.
    pub fn slot_type(&self, slot: usize) -> Option<&'static dyn SlotType> {
        self.container.kind().slot_type(slot)
    }

    /// Staged contents of a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        match self.changes.get(&slot) {
            Some(staged) => staged.as_ref(),
            None => self.container.get(slot),
        }
    }

    /// Stage a slot write. Empty stacks are stored as `None`.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        self.changes
            .insert(slot, stack.and_then(ItemStack::non_empty));
    }

    /// Staged cursor item.
    pub fn floating(&self) -> Option<&ItemStack> {
        match &self.floating {
            Some(staged) => staged.as_ref(),
            None => self.container.floating(),
        }
    }

    /// Stage a cursor write.
    pub fn set_floating(&mut self, stack: Option<ItemStack>) {
        self.floating = Some(stack.and_then(ItemStack::non_empty));
    }

    /// Occupied slots in ascending order, staged writes included.
    pub fn occupied_slots(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .container
            .slots()
            .map(|(slot, _)| slot)
            .chain(self.changes.keys().copied())
            .collect();
        slots.sort_unstable();
        slots.dedup();
        slots.retain(|slot| self.get(*slot).is_some());
        slots
    }

    /// True if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.floating.is_none()
    }

    /// Apply every staged change at once, bump the revision and remember the
    /// previous state under a fresh action id.
    pub fn commit(self) -> CommittedTransaction {
        let container = self.container;
        let previous = RevertState {
            slots: self
                .changes
                .keys()
                .map(|slot| (*slot, container.get(*slot).cloned()))
                .collect(),
            floating: container.floating().cloned(),
        };
        for (slot, stack) in &self.changes {
            container.write_slot(*slot, stack.clone());
        }
        if let Some(floating) = self.floating {
            container.write_floating(floating);
        }
        let action_id = container.allocate_action(previous);
        CommittedTransaction {
            action_id,
            changes: self.changes,
            floating: container.floating().cloned(),
        }
    }
}
