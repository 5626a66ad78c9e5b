//! Encoding gate
//!
//! Runs after negotiation has selected a coding and before the codec
//! transforms the body. Binary responses are always marked and keep their
//! coding. Text responses lose a pending coding when the policy reserves
//! compression for binary payloads, and are left alone otherwise.

use crate::classifier::{classify_response, Representation};
use crate::config::BinaryResponseConfig;
use crate::marker::mark_binary;
use binwire_compression::{cancel_encoding, is_encoding_pending};
use http::Response;
use tracing::debug;

/// Effects the gate applies to one response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateDecision {
    /// Write the binary marker
    pub mark_binary: bool,
    /// Withdraw the pending content coding
    pub cancel_encoding: bool,
}

impl GateDecision {
    /// Leave the response untouched
    pub const PASS: GateDecision = GateDecision {
        mark_binary: false,
        cancel_encoding: false,
    };
}

/// Policy decision over classification, policy flag and pending coding
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodingGate {
    config: BinaryResponseConfig,
}

impl EncodingGate {
    /// Create a gate with a fixed policy
    pub fn new(config: BinaryResponseConfig) -> Self {
        Self { config }
    }

    /// The policy this gate enforces
    pub fn config(&self) -> &BinaryResponseConfig {
        &self.config
    }

    /// Pure decision table
    pub fn decide(&self, representation: Representation, encoding_pending: bool) -> GateDecision {
        match representation {
            Representation::Binary => GateDecision {
                mark_binary: true,
                cancel_encoding: false,
            },
            Representation::Text if encoding_pending && self.config.binary_compression_only => {
                GateDecision {
                    mark_binary: false,
                    cancel_encoding: true,
                }
            }
            Representation::Text if encoding_pending => GateDecision {
                mark_binary: self.config.mark_compressed_text,
                cancel_encoding: false,
            },
            Representation::Text => GateDecision::PASS,
        }
    }

    /// Classify the response, decide, and apply the decision to its headers
    pub fn apply<B>(&self, response: &mut Response<B>) -> GateDecision {
        let representation = classify_response(response);
        let encoding_pending = is_encoding_pending(response);
        let decision = self.decide(representation, encoding_pending);

        if decision.cancel_encoding {
            cancel_encoding(response);
        }
        if decision.mark_binary {
            mark_binary(response);
        }

        debug!(
            %representation,
            encoding_pending,
            binary_compression_only = self.config.binary_compression_only,
            mark_binary = decision.mark_binary,
            cancel_encoding = decision.cancel_encoding,
            "Encoding gate applied"
        );
        decision
    }
}
