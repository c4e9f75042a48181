//! Click prediction scenarios for chest and player inventory windows.
//!
//! Every successful click must commit atomically, send exactly one packet that
//! lists every changed slot and be revertable by its action id.

use std::collections::BTreeMap;
use std::sync::Arc;

use minemesh_core::Identifier;
use minemesh_world::container::{
    ClickCount, Container, ContainerClickC2SP, ContainerKind, FastMoveContainerAction, Item,
    ItemStack, PickAllContainerAction, SimpleContainerAction,
};

const CONTAINER_ID: i32 = 9;
const SERVER_REVISION: i32 = 3;

struct Items {
    apple: Arc<Item>,
    coal: Arc<Item>,
    egg: Arc<Item>,
}

impl Items {
    fn new() -> Self {
        Self {
            apple: Arc::new(Item::new(Identifier::minecraft("apple"))),
            coal: Arc::new(Item::new(Identifier::minecraft("coal"))),
            egg: Arc::new(Item::new(Identifier::minecraft("egg")).with_max_stack_size(16)),
        }
    }
}

fn chest() -> Container {
    let mut container = Container::new(CONTAINER_ID, ContainerKind::Chest { rows: 3 });
    container.set_server_revision(SERVER_REVISION);
    container
}

fn contents(container: &Container) -> BTreeMap<usize, ItemStack> {
    container
        .slots()
        .map(|(slot, stack)| (slot, stack.clone()))
        .collect()
}

fn packet(
    slot: Option<usize>,
    mode: u8,
    button: u8,
    changes: Vec<(usize, Option<ItemStack>)>,
    floating_item: Option<ItemStack>,
) -> ContainerClickC2SP {
    ContainerClickC2SP {
        container_id: CONTAINER_ID,
        revision: SERVER_REVISION,
        slot,
        mode,
        button,
        action_id: 0,
        changes: changes.into_iter().collect(),
        floating_item,
    }
}

#[test]
fn hotbar_to_chest() {
    let items = Items::new();
    let mut container = chest();
    container.set(54, Some(ItemStack::new(items.apple.clone(), 9)));
    let mut sent = Vec::new();

    let action_id = container.invoke(&FastMoveContainerAction::new(54), &mut sent);

    assert_eq!(action_id, Some(0));
    assert_eq!(
        contents(&container),
        BTreeMap::from([(0, ItemStack::new(items.apple.clone(), 9))])
    );
    assert_eq!(
        sent,
        vec![packet(
            Some(54),
            1,
            0,
            vec![(54, None), (0, Some(ItemStack::new(items.apple, 9)))],
            None,
        )]
    );
}

#[test]
fn chest_to_hotbar_fills_last_slot_first() {
    let items = Items::new();
    let mut container = chest();
    container.set(0, Some(ItemStack::new(items.apple.clone(), 9)));
    let mut sent = Vec::new();

    container.invoke(&FastMoveContainerAction::new(0), &mut sent);

    assert_eq!(
        contents(&container),
        BTreeMap::from([(62, ItemStack::new(items.apple, 9))])
    );
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].mode, 1);
}

#[test]
fn chest_to_full_hotbar_lands_in_main_inventory() {
    let items = Items::new();
    let mut container = chest();
    for slot in 54..63 {
        container.set(slot, Some(ItemStack::new(items.coal.clone(), 64)));
    }
    container.set(0, Some(ItemStack::new(items.apple.clone(), 9)));
    let mut sent = Vec::new();

    container.invoke(&FastMoveContainerAction::new(0), &mut sent);

    assert!(container.get(0).is_none());
    assert_eq!(container.get(53), Some(&ItemStack::new(items.apple, 9)));
    assert_eq!(sent[0].changes.len(), 2);
}

#[test]
fn main_inventory_to_chest() {
    let items = Items::new();
    let mut container = chest();
    container.set(49, Some(ItemStack::new(items.apple.clone(), 9)));
    let mut sent = Vec::new();

    container.invoke(&FastMoveContainerAction::new(49), &mut sent);

    assert_eq!(
        contents(&container),
        BTreeMap::from([(0, ItemStack::new(items.apple, 9))])
    );
}

#[test]
fn fast_move_merges_before_using_empty_slots() {
    let items = Items::new();
    let mut container = chest();
    container.set(0, Some(ItemStack::new(items.coal.clone(), 63)));
    for slot in [58, 57, 56, 54] {
        container.set(slot, Some(ItemStack::new(items.coal.clone(), 50)));
    }
    container.set(62, Some(ItemStack::new(items.apple.clone(), 1)));
    let mut sent = Vec::new();

    container.invoke(&FastMoveContainerAction::new(0), &mut sent);

    for slot in [58, 57, 56] {
        assert_eq!(container.get(slot).map(|s| s.count), Some(64));
    }
    // 63 = 14 + 14 + 14 + 14 + 7
    assert_eq!(container.get(54).map(|s| s.count), Some(64));
    assert_eq!(container.get(61), Some(&ItemStack::new(items.coal, 7)));
    assert!(container.get(0).is_none());
    assert_eq!(container.get(62).map(|s| s.count), Some(1));
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].changes.len(), 6);
}

#[test]
fn fast_move_into_full_target_sends_nothing() {
    let items = Items::new();
    let mut container = chest();
    for slot in 27..63 {
        container.set(slot, Some(ItemStack::new(items.coal.clone(), 64)));
    }
    container.set(0, Some(ItemStack::new(items.apple.clone(), 9)));
    let revision = container.revision();
    let mut sent = Vec::new();

    assert!(container
        .invoke(&FastMoveContainerAction::new(0), &mut sent)
        .is_none());
    assert!(sent.is_empty());
    assert_eq!(container.revision(), revision);
}

#[test]
fn pick_all_collects_matching_stacks() {
    let items = Items::new();
    let mut container = chest();
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 1)));
    container.set(1, Some(ItemStack::new(items.apple.clone(), 2)));
    container.set(2, Some(ItemStack::new(items.coal.clone(), 2)));
    let mut sent = Vec::new();

    container.invoke(&PickAllContainerAction::new(5), &mut sent);

    assert_eq!(container.floating(), Some(&ItemStack::new(items.apple.clone(), 3)));
    assert_eq!(
        sent,
        vec![packet(
            Some(5),
            6,
            0,
            vec![(1, None)],
            Some(ItemStack::new(items.apple, 3)),
        )]
    );
}

#[test]
fn pick_all_stops_at_max_stack_size() {
    let items = Items::new();
    let mut container = chest();
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 3)));
    container.set(0, Some(ItemStack::new(items.apple.clone(), 63)));
    let mut sent = Vec::new();

    container.invoke(&PickAllContainerAction::new(0), &mut sent);

    assert_eq!(container.floating().map(|s| s.count), Some(64));
    assert_eq!(container.get(0).map(|s| s.count), Some(2));
    assert_eq!(sent[0].slot, Some(0));
}

#[test]
fn pick_all_without_matches_sends_nothing() {
    let items = Items::new();
    let mut container = chest();
    container.set_floating(Some(ItemStack::new(items.apple, 3)));
    container.set(0, Some(ItemStack::new(items.coal, 10)));
    let mut sent = Vec::new();

    assert!(container
        .invoke(&PickAllContainerAction::new(0), &mut sent)
        .is_none());
    assert!(sent.is_empty());
}

#[test]
fn put_all_into_empty_slot() {
    let items = Items::new();
    let mut container = chest();
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 7)));
    let mut sent = Vec::new();

    container.invoke(&SimpleContainerAction::new(Some(0), ClickCount::All), &mut sent);

    assert_eq!(
        sent,
        vec![packet(
            Some(0),
            0,
            0,
            vec![(0, Some(ItemStack::new(items.apple, 7)))],
            None,
        )]
    );
}

#[test]
fn put_one_into_empty_slot() {
    let items = Items::new();
    let mut container = chest();
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 7)));
    let mut sent = Vec::new();

    container.invoke(&SimpleContainerAction::new(Some(0), ClickCount::Part), &mut sent);

    assert_eq!(
        sent,
        vec![packet(
            Some(0),
            0,
            1,
            vec![(0, Some(ItemStack::new(items.apple.clone(), 1)))],
            Some(ItemStack::new(items.apple, 6)),
        )]
    );
}

#[test]
fn put_respects_item_stack_size() {
    let items = Items::new();
    let mut container = chest();
    container.set(12, Some(ItemStack::new(items.egg.clone(), 15)));
    container.set_floating(Some(ItemStack::new(items.egg.clone(), 14)));
    let mut sent = Vec::new();

    container.invoke(&SimpleContainerAction::new(Some(12), ClickCount::All), &mut sent);

    assert_eq!(
        sent,
        vec![packet(
            Some(12),
            0,
            0,
            vec![(12, Some(ItemStack::new(items.egg.clone(), 16)))],
            Some(ItemStack::new(items.egg, 13)),
        )]
    );
}

#[test]
fn put_swaps_different_items() {
    let items = Items::new();
    let mut container = chest();
    container.set(4, Some(ItemStack::new(items.coal.clone(), 5)));
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 2)));
    let mut sent = Vec::new();

    container.invoke(&SimpleContainerAction::new(Some(4), ClickCount::Part), &mut sent);

    assert_eq!(container.get(4), Some(&ItemStack::new(items.apple, 2)));
    assert_eq!(container.floating(), Some(&ItemStack::new(items.coal, 5)));
}

#[test]
fn click_outside_drops_floating_items() {
    let items = Items::new();
    let mut container = chest();
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 4)));
    let mut sent = Vec::new();

    container.invoke(&SimpleContainerAction::new(None, ClickCount::Part), &mut sent);
    assert_eq!(container.floating().map(|s| s.count), Some(3));
    assert_eq!(sent[0].slot, None);
    assert!(sent[0].changes.is_empty());

    container.invoke(&SimpleContainerAction::new(None, ClickCount::All), &mut sent);
    assert!(container.floating().is_none());
    assert_eq!(sent[1].action_id, 1);
}

#[test]
fn crafting_result_is_take_only() {
    let items = Items::new();
    let mut container = Container::new(0, ContainerKind::PlayerInventory);
    container.set(0, Some(ItemStack::new(items.apple.clone(), 4)));
    container.set_floating(Some(ItemStack::new(items.apple.clone(), 60)));
    let mut sent = Vec::new();

    container.invoke(&SimpleContainerAction::new(Some(0), ClickCount::All), &mut sent);

    assert_eq!(container.floating().map(|s| s.count), Some(64));
    assert!(container.get(0).is_none());

    container.set(0, Some(ItemStack::new(items.coal, 1)));
    assert!(container
        .invoke(&SimpleContainerAction::new(Some(0), ClickCount::All), &mut sent)
        .is_none());
    assert_eq!(sent.len(), 1);
}

#[test]
fn revert_restores_previous_state() {
    let items = Items::new();
    let mut container = chest();
    container.set(54, Some(ItemStack::new(items.apple.clone(), 9)));
    let before = contents(&container);
    let mut sent = Vec::new();

    let first = container
        .invoke(&FastMoveContainerAction::new(54), &mut sent)
        .expect("fast move succeeds");
    let second = container
        .invoke(&SimpleContainerAction::new(Some(0), ClickCount::All), &mut sent)
        .expect("pick succeeds");
    assert_eq!((first, second), (0, 1));
    assert_eq!(container.pending_actions().collect::<Vec<_>>(), vec![0, 1]);

    assert!(container.revert(second));
    assert!(container.floating().is_none());
    assert_eq!(container.get(0), Some(&ItemStack::new(items.apple, 9)));

    assert!(container.revert(first));
    assert_eq!(contents(&container), before);
    assert!(!container.revert(first));
}

#[test]
fn acknowledge_forgets_action() {
    let items = Items::new();
    let mut container = chest();
    container.set(54, Some(ItemStack::new(items.apple, 9)));
    let mut sent = Vec::new();

    let action = container
        .invoke(&FastMoveContainerAction::new(54), &mut sent)
        .expect("fast move succeeds");
    assert!(container.acknowledge(action));
    assert!(!container.revert(action));
    assert_eq!(container.pending_actions().count(), 0);
}
