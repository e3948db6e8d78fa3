//! Per-session conversation state.
//!
//! One context per logical session, owned by the caller and threaded through
//! classification explicitly. There is no process-wide singleton; concurrent
//! sessions each own an independent instance.

use serde::{Deserialize, Serialize};

use crate::transfer::TransferDetails;

/// Mutable state carried across the turns of a single session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Most recent transfer, for "do the same on X" follow-ups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transfer: Option<TransferDetails>,
    /// Most recent proof type ("kyc", "location", "custom", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_proof_type: Option<String>,
    /// Most recent proof id handed to the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_proof_id: Option<String>,
    /// Completed turns, oldest first
    #[serde(default)]
    pub history: Vec<TurnRecord>,
}

/// One completed conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub message: String,
    pub response: String,
    /// Function name of the classified intent, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; the session starts over.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Append a completed turn to the history.
    pub fn record_turn(
        &mut self,
        message: impl Into<String>,
        response: impl Into<String>,
        function: Option<String>,
    ) {
        self.history.push(TurnRecord {
            message: message.into(),
            response: response.into(),
            function,
        });
    }
}
