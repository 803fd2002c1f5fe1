mod error;

pub use error::ProtocolError;

use crate::{
    EventPolicies, EventPolicy, LifecycleConfig, NetworkEventType, ReliableChannelConfig,
};

// Protocol
/// Everything both ends of a connection must agree on. Built once at
/// startup, then locked and shared with the endpoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Protocol {
    pub event_policies: EventPolicies,
    pub reliable: ReliableChannelConfig,
    pub lifecycle: LifecycleConfig,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn event_policy(&mut self, event_type: NetworkEventType, policy: EventPolicy) -> &mut Self {
        self.check_lock();
        self.event_policies.set(event_type, policy);
        self
    }

    pub fn reliable_channel(&mut self, config: ReliableChannelConfig) -> &mut Self {
        self.check_lock();
        self.reliable = config;
        self
    }

    pub fn lifecycle(&mut self, config: LifecycleConfig) -> &mut Self {
        self.check_lock();
        self.lifecycle = config;
        self
    }

    // Non-panicking builder methods

    pub fn try_event_policy(
        &mut self,
        event_type: NetworkEventType,
        policy: EventPolicy,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.event_policies.set(event_type, policy);
        Ok(self)
    }

    pub fn try_reliable_channel(&mut self, config: ReliableChannelConfig) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.reliable = config;
        Ok(self)
    }

    pub fn try_lifecycle(&mut self, config: LifecycleConfig) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.lifecycle = config;
        Ok(self)
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            return Err(ProtocolError::AlreadyLocked);
        }
        Ok(())
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
