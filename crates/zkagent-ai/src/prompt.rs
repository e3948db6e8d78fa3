//! Prompt engineering for the assisted classifier.

/// System prompt framing the assistant's capabilities.
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant for a Zero-Knowledge Proof (ZKP) system. You can:
1. Have natural conversations on any topic
2. Generate ZK proofs for: KYC compliance, AI content authenticity, and device location
3. Execute USDC transfers (with or without KYC verification depending on request)
4. List and verify existing proofs

When users ask for proof generation, transfers, or verification, you should detect their intent and respond appropriately.
Be helpful, conversational, and can add personality, humor, or detailed explanations as requested.

IMPORTANT: Even if a message contains extra words like "with humor", "and explain", etc., you should still detect the core intent.
For example:
- "Prove Collatz steps with raunchy humor" -> Still a proof request for Collatz
- "prove kyc and make it funny" -> Still a KYC proof request
- "explain how to prove location" -> Still a location proof request

USDC Transfer Rules:
- If a transfer mentions "proof", "verify", "verified" AND "KYC" or "compliant" -> Requires KYC proof
- Otherwise, USDC transfers should be direct without proof generation
- Examples:
  - "Send 0.1 USDC to Alice if KYC compliant" -> Requires KYC proof
  - "Send 0.1 USDC to Alice" -> Direct transfer, no proof needed

Available commands you can detect:
- Prove KYC compliance
- Prove AI content authenticity
- Prove device location (supports San Francisco/SF, New York/NYC, London, Tokyo)
- Send USDC to addresses/names (alice, bob, charlie) - with or without KYC
- Verify proof [proof_id]
- List all proofs/verifications (or "Proof History"/"Verification History")
- Custom proof requests with C code
- Prove Collatz steps / prime check / digital root

You can combine natural conversation with these commands. For example, if someone asks "prove my location with humor",
you should both detect the location proof intent AND provide a humorous response."#;

/// Build the per-message analysis prompt.
///
/// The model must answer with a single JSON object matching
/// `zkagent_intent::AssistAnalysis`.
pub fn build_analysis_prompt(message: &str) -> String {
    format!(
        r#"Analyze this message and determine:
1. What the user wants (natural conversation, proof generation, transfer, etc.)
2. Generate an appropriate response (if they ask for humor, be funny!)
3. If it's a command, identify which type

IMPORTANT: Look for proof keywords even if mixed with other words:
- "prove collatz" or "collatz steps" or "collatz proof" -> custom_proof (Collatz)
- "prove prime" or "prime check" -> custom_proof (prime)
- "prove digital root" -> custom_proof (digital root)
- These work even with extra words like "with humor", "and explain", etc.

For list commands:
- "Proof History" or "list all proofs" -> list (proofs)
- "Verification History" or "list verifications" -> list (verifications)

For USDC transfers:
- If message contains "proof/verify/verified" AND "KYC/compliant" -> transfer with KYC proof required (requires_kyc: true)
- Otherwise -> direct transfer without proof (requires_kyc: false)

Message: "{message}"

Respond in JSON format:
{{
    "response": "Your natural language response to the user",
    "intent_type": "none|kyc_proof|ai_proof|location_proof|transfer|verify|list|custom_proof",
    "details": {{
        // Any relevant details based on intent_type
        // For location: {{"location": "city_name"}}
        // For transfer: {{"amount": "0.1", "recipient": "alice", "requires_kyc": true/false}}
        // For verify: {{"proof_id": "proof_xxx"}}
        // For custom_proof: {{"proof_type": "collatz|prime|digital_root"}}
        // For list: {{"list_type": "proofs" or "verifications"}}
    }},
    "personality": {{
        "add_humor": true/false,
        "add_explanation": true/false,
        "tone": "friendly|professional|humorous|educational"
    }}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_message() {
        let prompt = build_analysis_prompt("prove my kyc");
        assert!(prompt.contains("Message: \"prove my kyc\""));
        assert!(prompt.contains("intent_type"));
    }
}
