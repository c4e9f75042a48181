//! Client-side container state and click prediction.
//!
//! Every click is staged in a [`ContainerTransaction`], committed as one unit
//! and mirrored by exactly one [`ContainerClickC2SP`]. Clicks that are not
//! allowed leave the container untouched and send nothing.

mod actions;
mod kind;
mod packet;
mod slot;
mod stack;
mod transaction;

use std::collections::BTreeMap;

use tracing::trace;

pub use actions::{
    Click, ClickCount, CloneContainerAction, ContainerAction, DropContainerAction,
    FastMoveContainerAction, PickAllContainerAction, SimpleContainerAction,
    SlotSwapContainerAction,
};
pub use kind::{ContainerKind, ContainerSection, SwapTarget};
pub use packet::{ContainerClickC2SP, PacketSink};
pub use slot::{ArmorSlot, DefaultSlot, EquipmentSlot, RemoveOnlySlot, SlotType};
pub use stack::{Item, ItemStack, DEFAULT_STACK_SIZE};
pub use transaction::{CommittedTransaction, ContainerTransaction};

use transaction::RevertState;

/// An open container window.
#[derive(Debug, Clone)]
pub struct Container {
    id: i32,
    kind: ContainerKind,
    slots: BTreeMap<usize, ItemStack>,
    floating: Option<ItemStack>,
    revision: u64,
    server_revision: i32,
    next_action_id: i32,
    pending: BTreeMap<i32, RevertState>,
    creative: bool,
}

impl Container {
    /// Empty container with window id `id`.
    pub fn new(id: i32, kind: ContainerKind) -> Self {
        Self {
            id,
            kind,
            slots: BTreeMap::new(),
            floating: None,
            revision: 0,
            server_revision: 0,
            next_action_id: 0,
            pending: BTreeMap::new(),
            creative: false,
        }
    }

    /// Window id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Slot layout.
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Local revision, bumped on every visible change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Revision last received from the server.
    pub fn server_revision(&self) -> i32 {
        self.server_revision
    }

    /// Record a revision received from the server.
    pub fn set_server_revision(&mut self, revision: i32) {
        self.server_revision = revision;
    }

    /// True if creative-only clicks are allowed.
    pub fn is_creative(&self) -> bool {
        self.creative
    }

    /// Allow or forbid creative-only clicks.
    pub fn set_creative(&mut self, creative: bool) {
        self.creative = creative;
    }

    /// Contents of a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(&slot)
    }

    /// Replace a slot outside of any transaction, e.g. from a server update.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if self.write_slot(slot, stack) {
            self.revision += 1;
        }
    }

    /// Occupied slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots.iter().map(|(slot, stack)| (*slot, stack))
    }

    /// Item on the cursor.
    pub fn floating(&self) -> Option<&ItemStack> {
        self.floating.as_ref()
    }

    /// Replace the cursor item outside of any transaction.
    pub fn set_floating(&mut self, stack: Option<ItemStack>) {
        if self.write_floating(stack) {
            self.revision += 1;
        }
    }

    /// Start staging changes.
    pub fn transaction(&mut self) -> ContainerTransaction<'_> {
        ContainerTransaction::new(self)
    }

    /// Run a click. On success the changes are committed, one packet is sent
    /// and the allocated action id is returned.
    pub fn invoke<A>(&mut self, action: &A, sink: &mut dyn PacketSink) -> Option<i32>
    where
        A: ContainerAction + ?Sized,
    {
        let container_id = self.id;
        let revision = self.server_revision;
        let mut transaction = self.transaction();
        let Some(click) = action.click(&mut transaction) else {
            trace!(container = container_id, "click rejected");
            return None;
        };
        let committed = transaction.commit();
        sink.send(ContainerClickC2SP {
            container_id,
            revision,
            slot: click.slot,
            mode: click.mode,
            button: click.button,
            action_id: committed.action_id,
            changes: committed.changes,
            floating_item: committed.floating,
        });
        Some(committed.action_id)
    }

    /// Action ids still awaiting a server verdict.
    pub fn pending_actions(&self) -> impl Iterator<Item = i32> + '_ {
        self.pending.keys().copied()
    }

    /// The server accepted an action; its revert state is dropped.
    pub fn acknowledge(&mut self, action_id: i32) -> bool {
        self.pending.remove(&action_id).is_some()
    }

    /// The server rejected an action; restore the state it replaced.
    pub fn revert(&mut self, action_id: i32) -> bool {
        let Some(previous) = self.pending.remove(&action_id) else {
            return false;
        };
        for (slot, stack) in previous.slots {
            self.write_slot(slot, stack);
        }
        self.write_floating(previous.floating);
        self.revision += 1;
        trace!(container = self.id, action_id, "action reverted");
        true
    }

    /// Drop every item and pending action.
    pub fn clear(&mut self) {
        if self.slots.is_empty() && self.floating.is_none() {
            return;
        }
        self.slots.clear();
        self.floating = None;
        self.pending.clear();
        self.revision += 1;
    }

    fn write_slot(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match stack.and_then(ItemStack::non_empty) {
            Some(stack) => self.slots.insert(slot, stack.clone()).as_ref() != Some(&stack),
            None => self.slots.remove(&slot).is_some(),
        }
    }

    fn write_floating(&mut self, stack: Option<ItemStack>) -> bool {
        let stack = stack.and_then(ItemStack::non_empty);
        if self.floating == stack {
            return false;
        }
        self.floating = stack;
        true
    }

    fn allocate_action(&mut self, previous: RevertState) -> i32 {
        let action_id = self.next_action_id;
        self.next_action_id = self.next_action_id.wrapping_add(1);
        self.pending.insert(action_id, previous);
        self.revision += 1;
        action_id
    }
}
