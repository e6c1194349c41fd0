use super::def::{EffectColor, EffectId, Polarity};
use crate::error::{ErrorContext, ErrorSeverity, GameError};

/// Errors raised while adding, resolving or running effects.
///
/// All variants are missing-data or content errors: the operation is skipped
/// and the battle continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// Effect id not present in the catalog.
    #[error("unknown effect '{id}'")]
    UnknownEffect { id: EffectId, context: ErrorContext },

    /// Custom behavior name not registered with the manager.
    #[error("effect '{effect}' references unregistered behavior '{name}'")]
    UnknownBehavior {
        effect: EffectId,
        name: String,
        context: ErrorContext,
    },

    /// Ryft outcome classification with no matching effect.
    #[error("no effect classified {color}/{polarity}")]
    NoEffectForClass {
        color: EffectColor,
        polarity: Polarity,
        context: ErrorContext,
    },

    /// A behavior hook reported a failure.
    #[error("effect '{effect}' failed: {reason}")]
    Behavior {
        effect: EffectId,
        reason: String,
        context: ErrorContext,
    },
}

impl EffectError {
    pub fn unknown_effect(id: EffectId, context: ErrorContext) -> Self {
        Self::UnknownEffect {
            id,
            context: context.with_message("effect id missing from catalog"),
        }
    }

    pub fn unknown_behavior(
        effect: EffectId,
        name: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Self::UnknownBehavior {
            effect,
            name: name.into(),
            context: context.with_message("custom behavior not registered"),
        }
    }

    pub fn no_effect_for_class(
        color: EffectColor,
        polarity: Polarity,
        context: ErrorContext,
    ) -> Self {
        Self::NoEffectForClass {
            color,
            polarity,
            context: context.with_message("ryft outcome has no candidates"),
        }
    }

    pub fn behavior(effect: EffectId, reason: impl Into<String>, context: ErrorContext) -> Self {
        Self::Behavior {
            effect,
            reason: reason.into(),
            context,
        }
    }
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEffect { .. } => ErrorSeverity::Validation,
            Self::UnknownBehavior { .. } => ErrorSeverity::Validation,
            Self::NoEffectForClass { .. } => ErrorSeverity::Validation,
            Self::Behavior { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::UnknownEffect { context, .. }
            | Self::UnknownBehavior { context, .. }
            | Self::NoEffectForClass { context, .. }
            | Self::Behavior { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffect { .. } => "EFFECT_UNKNOWN",
            Self::UnknownBehavior { .. } => "EFFECT_UNKNOWN_BEHAVIOR",
            Self::NoEffectForClass { .. } => "EFFECT_NO_CANDIDATE",
            Self::Behavior { .. } => "EFFECT_BEHAVIOR_FAILED",
        }
    }
}
