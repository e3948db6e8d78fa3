//! Intent validation - catch caller bugs before they reach a collaborator.
//!
//! An intent whose arguments disagree with its function is a programming
//! error on the producing side, not a runtime condition to recover from; the
//! checks here make that explicit at the boundary.

use thiserror::Error;

use crate::intent::{Intent, ProofFunction};

/// Validation errors.
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("wrong arity for {function}: expected {expected}, found {found}")]
    WrongArity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of {function} is not numeric: {value:?}")]
    NonNumericArgument {
        function: &'static str,
        index: usize,
        value: String,
    },

    #[error("{function} requires transfer_details in additional_context")]
    MissingTransferDetails { function: &'static str },

    #[error("list_proofs argument must be \"proofs\" or \"verifications\", found {0:?}")]
    InvalidListType(String),

    #[error("step_size must be positive")]
    ZeroStepSize,
}

/// Validate an intent against its function's argument contract.
pub fn validate(intent: &Intent) -> Result<(), Vec<IntentError>> {
    let mut errors = Vec::new();
    let function = intent.function.as_str();

    let expected = intent.function.arity();
    if intent.arguments.len() != expected {
        errors.push(IntentError::WrongArity {
            function,
            expected,
            found: intent.arguments.len(),
        });
    }

    if intent.step_size == 0 {
        errors.push(IntentError::ZeroStepSize);
    }

    match intent.function {
        ProofFunction::ProveKyc
        | ProofFunction::ProveAiContent
        | ProofFunction::ProveLocation
        | ProofFunction::ProveCustom => {
            for (index, value) in intent.arguments.iter().enumerate() {
                if value.parse::<u64>().is_err() {
                    errors.push(IntentError::NonNumericArgument {
                        function,
                        index,
                        value: value.clone(),
                    });
                }
            }
        }
        ProofFunction::ListProofs => {
            if let Some(arg) = intent.arguments.first() {
                if arg != "proofs" && arg != "verifications" {
                    errors.push(IntentError::InvalidListType(arg.clone()));
                }
            }
        }
        ProofFunction::Verify => {}
    }

    if intent.additional_context.is_automated_transfer
        && intent.additional_context.transfer_details.is_none()
    {
        errors.push(IntentError::MissingTransferDetails { function });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
