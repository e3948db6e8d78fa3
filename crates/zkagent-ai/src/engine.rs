//! Intent engine - the main entry point for classifying a chat turn.
//!
//! Three stages, in order:
//!
//! 1. Assisted analysis through the chat-completions API, when configured.
//!    Its structured output picks the branch; slot extraction stays with the
//!    deterministic code.
//! 2. The deterministic rule cascade, when the assisted stage is unavailable,
//!    malformed, or names no intent.
//! 3. A conversational or help reply when nothing matched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::client::OpenAiClient;
use crate::config::AssistConfig;
use crate::prompt::{self, SYSTEM_PROMPT};
use zkagent_intent::{
    classify, classify_assisted, AssistAnalysis, Classification, ConversationContext, Intent,
    TurnMetadata,
};

/// What the assisted stage produced for a turn.
///
/// `Unavailable` and `Malformed` are ordinary control flow, not errors: both
/// degrade to the deterministic cascade.
#[derive(Debug)]
pub enum AssistOutcome {
    Classified(AssistAnalysis),
    /// No client configured, or the API call failed
    Unavailable,
    /// The reply was not parseable as an analysis document
    Malformed,
}

/// One fully processed chat turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub response: String,
    pub intent: Option<Intent>,
    pub metadata: TurnMetadata,
    /// Fresh proof id minted for this turn
    pub proof_id: String,
}

/// Engine combining the assisted and deterministic classification stages.
pub struct IntentEngine {
    client: Option<OpenAiClient>,
}

static PROOF_NONCE: AtomicU64 = AtomicU64::new(0);

/// Mint a fresh proof id: `proof_<unix millis>_<6 hex chars>`.
///
/// The suffix hashes a process-local nonce so ids minted in the same
/// millisecond stay distinct.
pub fn mint_proof_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let nonce = PROOF_NONCE.fetch_add(1, Ordering::Relaxed);
    let digest = Sha256::digest(format!("{millis}:{nonce}").as_bytes());
    format!(
        "proof_{millis}_{:02x}{:02x}{:02x}",
        digest[0], digest[1], digest[2]
    )
}

const HELP_TEXT: &str = "I can help you with:\n\
    • Generating ZK proofs (KYC, AI content, location)\n\
    • USDC transfers with KYC verification\n\
    • Listing your proofs\n\
    • Custom proofs (Collatz, prime check, digital root)\n\
    \nTry: 'prove KYC compliance' or 'send 0.5 USDC to bob'";

impl IntentEngine {
    /// Create a new engine. Without an API key the assisted stage is skipped
    /// entirely and every turn goes through the deterministic cascade.
    pub fn new(config: AssistConfig) -> Self {
        let client = if config.api_key.is_empty() {
            None
        } else {
            OpenAiClient::new(config).ok()
        };

        if client.is_none() {
            info!("no API key configured, assisted classification disabled");
        }

        Self { client }
    }

    /// Whether the assisted stage is active.
    pub fn assisted(&self) -> bool {
        self.client.is_some()
    }

    /// Run the assisted stage for one message.
    pub async fn analyze(&self, message: &str) -> AssistOutcome {
        let Some(client) = &self.client else {
            return AssistOutcome::Unavailable;
        };

        let user_prompt = prompt::build_analysis_prompt(message);
        let text = match client.complete(SYSTEM_PROMPT, &user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("assisted classification unavailable: {e}");
                return AssistOutcome::Unavailable;
            }
        };

        match serde_json::from_str::<AssistAnalysis>(&text) {
            Ok(analysis) => {
                debug!(intent_type = ?analysis.intent_type, "assisted analysis");
                AssistOutcome::Classified(analysis)
            }
            Err(e) => {
                warn!("malformed assisted analysis: {e}");
                AssistOutcome::Malformed
            }
        }
    }

    /// Process one chat turn: classify, update context, record history.
    pub async fn chat(&self, message: &str, ctx: &mut ConversationContext) -> Turn {
        let proof_id = mint_proof_id();
        let outcome = self.analyze(message).await;
        self.resolve(message, &proof_id, outcome, ctx)
    }

    /// Second half of [`chat`](Self::chat), split out so the deterministic
    /// path is testable without a client.
    fn resolve(
        &self,
        message: &str,
        proof_id: &str,
        outcome: AssistOutcome,
        ctx: &mut ConversationContext,
    ) -> Turn {
        let assist_response = match &outcome {
            AssistOutcome::Classified(a) if !a.response.is_empty() => Some(a.response.clone()),
            _ => None,
        };

        let mut classification = match &outcome {
            AssistOutcome::Classified(analysis) => {
                classify_assisted(analysis, message, proof_id, ctx)
            }
            _ => None,
        };

        if classification.is_none() {
            classification = classify(message, proof_id, ctx);
            // Keep the assisted reply text even when the cascade picked the
            // branch.
            if let (Some(c), Some(text)) = (&mut classification, &assist_response) {
                c.response = text.clone();
            }
        }

        let turn = match classification {
            Some(Classification {
                intent,
                response,
                metadata,
            }) => Turn {
                response,
                intent,
                metadata,
                proof_id: proof_id.to_string(),
            },
            None => match assist_response {
                Some(response) => Turn {
                    response,
                    intent: None,
                    metadata: TurnMetadata::Conversation,
                    proof_id: proof_id.to_string(),
                },
                None => Turn {
                    response: HELP_TEXT.to_string(),
                    intent: None,
                    metadata: TurnMetadata::Help,
                    proof_id: proof_id.to_string(),
                },
            },
        };

        if let TurnMetadata::ManualProof { proof_id, .. }
        | TurnMetadata::KycTransferAutomationStart { proof_id, .. } = &turn.metadata
        {
            ctx.last_proof_id = Some(proof_id.clone());
        }

        let function = turn
            .intent
            .as_ref()
            .map(|i| i.function.as_str().to_string());
        ctx.record_turn(message, turn.response.clone(), function);

        turn
    }
}
