//! Error types for card execution and battle lifecycle.

use super::Phase;
use crate::actor::ActorId;
use crate::card::CardId;
use crate::effect::EffectError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::stats::ResourceKind;

/// Rejections from [`Battle::execute_card`](super::Battle::execute_card).
///
/// A rejected card leaves the battle untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("unknown card '{card}'")]
    UnknownCard { card: CardId, context: ErrorContext },

    #[error("{actor} is not part of this battle")]
    UnknownActor { actor: ActorId, context: ErrorContext },

    #[error("{actor} is defeated")]
    ActorDead { actor: ActorId, context: ErrorContext },

    #[error("{actor} is stunned")]
    ActorStunned { actor: ActorId, context: ErrorContext },

    #[error("{actor} cannot act during {phase}")]
    WrongPhase {
        actor: ActorId,
        phase: Phase,
        context: ErrorContext,
    },

    #[error("{target} is not a legal target for '{card}'")]
    IllegalTarget {
        card: CardId,
        target: ActorId,
        context: ErrorContext,
    },

    #[error("no valid target for '{card}'")]
    NoValidTarget { card: CardId, context: ErrorContext },

    #[error("{actor} needs {needed} {resource}, has {available}")]
    InsufficientResource {
        actor: ActorId,
        resource: ResourceKind,
        needed: u32,
        available: u32,
        context: ErrorContext,
    },
}

impl CardError {
    pub fn unknown_card(card: CardId, turn: u32) -> Self {
        Self::UnknownCard {
            card,
            context: ErrorContext::new(turn).with_message("card id missing from catalog"),
        }
    }

    pub fn unknown_actor(actor: ActorId, turn: u32) -> Self {
        Self::UnknownActor {
            actor,
            context: ErrorContext::new(turn).with_actor(actor),
        }
    }

    pub fn actor_dead(actor: ActorId, turn: u32) -> Self {
        Self::ActorDead {
            actor,
            context: ErrorContext::new(turn).with_actor(actor),
        }
    }

    pub fn actor_stunned(actor: ActorId, turn: u32) -> Self {
        Self::ActorStunned {
            actor,
            context: ErrorContext::new(turn).with_actor(actor),
        }
    }

    pub fn wrong_phase(actor: ActorId, phase: Phase, turn: u32) -> Self {
        Self::WrongPhase {
            actor,
            phase,
            context: ErrorContext::new(turn)
                .with_actor(actor)
                .with_message("actor's side is not taking its turn"),
        }
    }

    pub fn illegal_target(card: CardId, target: ActorId, turn: u32) -> Self {
        Self::IllegalTarget {
            card,
            target,
            context: ErrorContext::new(turn).with_actor(target),
        }
    }

    pub fn no_valid_target(card: CardId, turn: u32) -> Self {
        Self::NoValidTarget {
            card,
            context: ErrorContext::new(turn).with_message("no alive opponent"),
        }
    }

    pub fn insufficient_resource(
        actor: ActorId,
        resource: ResourceKind,
        needed: u32,
        available: u32,
        turn: u32,
    ) -> Self {
        Self::InsufficientResource {
            actor,
            resource,
            needed,
            available,
            context: ErrorContext::new(turn).with_actor(actor),
        }
    }
}

impl GameError for CardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCard { .. } | Self::UnknownActor { .. } | Self::IllegalTarget { .. } => {
                ErrorSeverity::Validation
            }
            Self::ActorDead { .. }
            | Self::ActorStunned { .. }
            | Self::WrongPhase { .. }
            | Self::NoValidTarget { .. }
            | Self::InsufficientResource { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::UnknownCard { context, .. }
            | Self::UnknownActor { context, .. }
            | Self::ActorDead { context, .. }
            | Self::ActorStunned { context, .. }
            | Self::WrongPhase { context, .. }
            | Self::IllegalTarget { context, .. }
            | Self::NoValidTarget { context, .. }
            | Self::InsufficientResource { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCard { .. } => "CARD_UNKNOWN",
            Self::UnknownActor { .. } => "CARD_UNKNOWN_ACTOR",
            Self::ActorDead { .. } => "CARD_ACTOR_DEAD",
            Self::ActorStunned { .. } => "CARD_ACTOR_STUNNED",
            Self::WrongPhase { .. } => "CARD_WRONG_PHASE",
            Self::IllegalTarget { .. } => "CARD_ILLEGAL_TARGET",
            Self::NoValidTarget { .. } => "CARD_NO_VALID_TARGET",
            Self::InsufficientResource { .. } => "CARD_INSUFFICIENT_RESOURCE",
        }
    }
}

/// Errors from battle lifecycle and effect operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("expected {expected}, battle is in {found}")]
    WrongPhase { expected: Phase, found: Phase },

    #[error("effect owner {0} is missing from the roster")]
    OwnerMissing(ActorId),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Effect(#[from] EffectError),
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } => ErrorSeverity::Validation,
            Self::OwnerMissing(_) => ErrorSeverity::Internal,
            Self::Card(err) => err.severity(),
            Self::Effect(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Card(err) => err.context(),
            Self::Effect(err) => err.context(),
            Self::WrongPhase { .. } | Self::OwnerMissing(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "BATTLE_WRONG_PHASE",
            Self::OwnerMissing(_) => "BATTLE_OWNER_MISSING",
            Self::Card(err) => err.error_code(),
            Self::Effect(err) => err.error_code(),
        }
    }
}
