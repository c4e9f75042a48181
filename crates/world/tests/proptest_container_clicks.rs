//! Property-based tests for container click prediction
//!
//! Validates container invariants:
//! - Clicks inside the window never create or destroy items
//! - No slot ever exceeds the item's max stack size
//! - Each accepted click sends exactly one packet
//! - Reverting every pending action in reverse order restores the start state

use std::collections::BTreeMap;
use std::sync::Arc;

use minemesh_core::Identifier;
use minemesh_world::container::{
    ClickCount, Container, ContainerAction, ContainerKind, FastMoveContainerAction, Item,
    ItemStack, PickAllContainerAction, SimpleContainerAction, SlotSwapContainerAction,
    SwapTarget,
};
use proptest::prelude::*;

const SLOTS: usize = 63;

#[derive(Debug, Clone)]
enum Op {
    Simple(usize, bool),
    FastMove(usize),
    Swap(usize, u8),
    PickAll(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SLOTS, any::<bool>()).prop_map(|(slot, all)| Op::Simple(slot, all)),
        (0..SLOTS).prop_map(Op::FastMove),
        (0..SLOTS, 0u8..9).prop_map(|(slot, key)| Op::Swap(slot, key)),
        (0..SLOTS).prop_map(Op::PickAll),
    ]
}

fn action(op: &Op) -> Box<dyn ContainerAction> {
    match *op {
        Op::Simple(slot, all) => Box::new(SimpleContainerAction::new(
            Some(slot),
            if all { ClickCount::All } else { ClickCount::Part },
        )),
        Op::FastMove(slot) => Box::new(FastMoveContainerAction::new(slot)),
        Op::Swap(slot, key) => Box::new(SlotSwapContainerAction::new(
            slot,
            SwapTarget::Hotbar(key),
        )),
        Op::PickAll(slot) => Box::new(PickAllContainerAction::new(slot)),
    }
}

fn totals(container: &Container) -> BTreeMap<String, u32> {
    let mut totals = BTreeMap::new();
    for stack in container
        .slots()
        .map(|(_, stack)| stack)
        .chain(container.floating())
    {
        *totals
            .entry(stack.item.identifier().to_string())
            .or_insert(0) += stack.count;
    }
    totals
}

fn snapshot(container: &Container) -> (BTreeMap<usize, ItemStack>, Option<ItemStack>) {
    (
        container
            .slots()
            .map(|(slot, stack)| (slot, stack.clone()))
            .collect(),
        container.floating().cloned(),
    )
}

proptest! {
    /// Property: Clicks conserve items and respect stack limits
    #[test]
    fn clicks_conserve_items(
        initial in prop::collection::vec((0..SLOTS, 0usize..2, 1u32..=16), 0..20),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let kinds = [
            Arc::new(Item::new(Identifier::minecraft("apple"))),
            Arc::new(Item::new(Identifier::minecraft("egg")).with_max_stack_size(16)),
        ];
        let mut container = Container::new(1, ContainerKind::Chest { rows: 3 });
        for (slot, kind, count) in initial {
            container.set(slot, Some(ItemStack::new(kinds[kind].clone(), count)));
        }
        let start = snapshot(&container);
        let expected = totals(&container);
        let mut sent = Vec::new();
        let mut accepted = Vec::new();

        for op in &ops {
            let before = sent.len();
            if let Some(action_id) = container.invoke(action(op).as_ref(), &mut sent) {
                accepted.push(action_id);
                prop_assert_eq!(sent.len(), before + 1);
            } else {
                prop_assert_eq!(sent.len(), before);
            }
            prop_assert_eq!(&totals(&container), &expected, "after {:?}", op);
            for (_, stack) in container.slots() {
                prop_assert!(stack.count <= stack.max_stack_size());
            }
        }

        for action_id in accepted.iter().rev() {
            prop_assert!(container.revert(*action_id));
        }
        prop_assert_eq!(snapshot(&container), start);
    }
}
