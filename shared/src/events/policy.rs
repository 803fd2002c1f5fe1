use std::collections::HashMap;

use crate::{DeliveryMethod, NetworkEventType};

/// Which path a batch of events takes to the peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryClass {
    /// Raw datagram, may be lost.
    Unreliable,
    /// Handed to the transport's own reliable-unordered mode.
    ReliableUnordered,
    /// Wrapped in this crate's sequenced reliable channel.
    ReliableViaChannel,
}

impl DeliveryClass {
    pub const ALL: [DeliveryClass; 3] = [
        Self::Unreliable,
        Self::ReliableUnordered,
        Self::ReliableViaChannel,
    ];

    /// Transport mode the composed batch is sent with.
    pub fn transport_method(self) -> DeliveryMethod {
        match self {
            Self::ReliableUnordered => DeliveryMethod::ReliableUnordered,
            Self::Unreliable | Self::ReliableViaChannel => DeliveryMethod::Unreliable,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventPolicy {
    pub delivery: DeliveryClass,
    /// A newer event with the same key replaces a queued older one.
    pub override_previous: bool,
}

impl EventPolicy {
    pub const fn new(delivery: DeliveryClass, override_previous: bool) -> Self {
        Self {
            delivery,
            override_previous,
        }
    }
}

/// Per event type delivery policy. Built once and handed to every endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct EventPolicies {
    policies: HashMap<NetworkEventType, EventPolicy>,
}

impl EventPolicies {
    pub fn get(&self, event_type: NetworkEventType) -> EventPolicy {
        self.policies
            .get(&event_type)
            .copied()
            .unwrap_or(EventPolicy::new(DeliveryClass::ReliableViaChannel, false))
    }

    pub fn set(&mut self, event_type: NetworkEventType, policy: EventPolicy) {
        self.policies.insert(event_type, policy);
    }
}

impl Default for EventPolicies {
    fn default() -> Self {
        use DeliveryClass::*;
        use NetworkEventType::*;

        let table = [
            (EntityUpdate, Unreliable, true),
            (ImportantEntityUpdate, ReliableViaChannel, true),
            (KillCharacter, ReliableViaChannel, false),
            (SelectCharacter, ReliableViaChannel, true),
            (PickItem, ReliableViaChannel, false),
            (InventoryUpdate, ReliableViaChannel, true),
            (ApplyStatusEffect, ReliableUnordered, false),
            (ComponentUpdate, Unreliable, true),
            (ImportantComponentUpdate, ReliableViaChannel, true),
            (PhysicsBodyPosition, Unreliable, true),
            (WallDamage, ReliableUnordered, true),
        ];

        let policies = table
            .into_iter()
            .map(|(event_type, delivery, override_previous)| {
                (event_type, EventPolicy::new(delivery, override_previous))
            })
            .collect();

        Self { policies }
    }
}
