use std::collections::BTreeMap;

use super::stack::ItemStack;

/// Container click sent to the server.
///
/// Field order follows the wire layout; encoding is left to the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerClickC2SP {
    /// Window id.
    pub container_id: i32,
    /// Last revision received from the server.
    pub revision: i32,
    /// Clicked slot, `None` for clicks outside the window.
    pub slot: Option<usize>,
    /// Click mode.
    pub mode: u8,
    /// Mouse button or hotbar key.
    pub button: u8,
    /// Locally allocated action id.
    pub action_id: i32,
    /// Every slot the client predicts to have changed.
    pub changes: BTreeMap<usize, Option<ItemStack>>,
    /// Predicted item on the cursor afterwards.
    pub floating_item: Option<ItemStack>,
}

/// Destination for outbound container packets.
pub trait PacketSink {
    /// Queue a packet.
    fn send(&mut self, packet: ContainerClickC2SP);
}

impl PacketSink for Vec<ContainerClickC2SP> {
    fn send(&mut self, packet: ContainerClickC2SP) {
        self.push(packet);
    }
}
