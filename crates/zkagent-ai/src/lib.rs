//! # zkagent AI Integration
//!
//! Assisted intent classification backed by an OpenAI-compatible
//! chat-completions API, layered over the deterministic cascade from
//! `zkagent-intent`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ User message │ --> │  Assisted stage  │ --> │  Classification  │
//! │  (free text) │     │ (chat completions)│    │ (Intent + reply) │
//! └──────────────┘     └──────────────────┘     └──────────────────┘
//!                             │ unavailable / malformed / "none"
//!                             v
//!                      ┌──────────────────┐
//!                      │ Rule cascade     │
//!                      │ (deterministic)  │
//!                      └──────────────────┘
//! ```
//!
//! The assisted stage only ever picks the branch and supplies reply text;
//! slot values (addresses, amounts, packed coordinates) always come from the
//! deterministic extractors, so a hallucinated detail cannot reach a proof
//! argument.
//!
//! ## Usage
//!
//! ```ignore
//! use zkagent_ai::{AssistConfig, IntentEngine};
//! use zkagent_intent::ConversationContext;
//!
//! let engine = IntentEngine::new(AssistConfig::from_env());
//! let mut ctx = ConversationContext::new();
//!
//! let turn = engine.chat("send 0.5 USDC to bob if KYC compliant", &mut ctx).await;
//! ```

mod client;
mod config;
mod engine;
mod prompt;

pub use client::{ClientError, OpenAiClient};
pub use config::{AssistConfig, AssistConfigBuilder};
pub use engine::{mint_proof_id, AssistOutcome, IntentEngine, Turn};
pub use prompt::{build_analysis_prompt, SYSTEM_PROMPT};

// Re-export the shared model for convenience
pub use zkagent_intent::{
    AssistAnalysis, AssistDetails, AssistIntentType, Classification, ConversationContext, Intent,
    Personality, TurnMetadata,
};
