//! Trigger-keyed subscriber list.

use std::rc::Rc;

use super::{CombatEventContext, Trigger};
use crate::battle::{Battle, CardError};
use crate::error::{ErrorSeverity, GameError};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// How long a subscription lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriptionScope {
    /// Dropped at BattleEnd.
    Battle,
    /// Survives battle teardown, removed only by [`EventBus::unsubscribe`].
    Session,
}

/// Errors a subscriber may report. Logged by the battle, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("subscriber '{name}' failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("subscriber card execution failed: {0}")]
    Card(#[from] CardError),
}

impl SubscriberError {
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl GameError for SubscriberError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Failed { .. } => ErrorSeverity::Recoverable,
            Self::Card(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Failed { .. } => "SUBSCRIBER_FAILED",
            Self::Card(_) => "SUBSCRIBER_CARD",
        }
    }
}

/// A reaction to a combat trigger.
///
/// Subscribers receive the battle mutably and may execute cards, add effects
/// or publish further events; nested publishes are bounded by the battle's
/// dispatch depth.
pub trait Subscriber {
    fn name(&self) -> &str {
        "anonymous"
    }

    fn on_event(&self, event: &CombatEventContext, battle: &mut Battle)
    -> Result<(), SubscriberError>;
}

/// Adapts a closure into a [`Subscriber`].
pub struct FnSubscriber<F> {
    name: String,
    callback: F,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&CombatEventContext, &mut Battle) -> Result<(), SubscriberError>,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&CombatEventContext, &mut Battle) -> Result<(), SubscriberError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(
        &self,
        event: &CombatEventContext,
        battle: &mut Battle,
    ) -> Result<(), SubscriberError> {
        (self.callback)(event, battle)
    }
}

struct Subscription {
    id: SubscriptionId,
    trigger: Trigger,
    scope: SubscriptionScope,
    subscriber: Rc<dyn Subscriber>,
}

/// Registration-ordered subscriber list.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        trigger: Trigger,
        scope: SubscriptionScope,
        subscriber: Rc<dyn Subscriber>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        tracing::trace!(
            target: "ryft::events",
            id = id.0,
            %trigger,
            subscriber = subscriber.name(),
            "subscribed"
        );
        self.subscriptions.push(Subscription {
            id,
            trigger,
            scope,
            subscriber,
        });
        id
    }

    /// Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    /// Point-in-time copy of the subscribers for `trigger`, in registration order.
    pub fn snapshot(&self, trigger: Trigger) -> Vec<Rc<dyn Subscriber>> {
        self.subscriptions
            .iter()
            .filter(|s| s.trigger == trigger)
            .map(|s| Rc::clone(&s.subscriber))
            .collect()
    }

    /// Drops every [`SubscriptionScope::Battle`] subscription.
    pub fn clear_battle_scoped(&mut self) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|s| s.scope == SubscriptionScope::Session);
        before - self.subscriptions.len()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Rc<dyn Subscriber> {
        Rc::new(FnSubscriber::new(name, |_, _| Ok(())))
    }

    #[test]
    fn snapshot_keeps_registration_order_per_trigger() {
        let mut bus = EventBus::new();
        bus.subscribe(Trigger::TurnStart, SubscriptionScope::Battle, noop("a"));
        bus.subscribe(Trigger::TurnEnd, SubscriptionScope::Battle, noop("x"));
        bus.subscribe(Trigger::TurnStart, SubscriptionScope::Battle, noop("b"));

        let names: Vec<String> = bus
            .snapshot(Trigger::TurnStart)
            .iter()
            .map(|s| s.name().to_owned())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn unsubscribe_and_scope_clearing() {
        let mut bus = EventBus::new();
        let battle = bus.subscribe(Trigger::TurnStart, SubscriptionScope::Battle, noop("a"));
        bus.subscribe(Trigger::TurnStart, SubscriptionScope::Session, noop("b"));
        bus.subscribe(Trigger::BattleEnd, SubscriptionScope::Battle, noop("c"));

        assert!(bus.unsubscribe(battle));
        assert!(!bus.unsubscribe(battle));
        assert_eq!(bus.clear_battle_scoped(), 1);
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.snapshot(Trigger::TurnStart).len(), 1);
    }
}
