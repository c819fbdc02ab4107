//! Harness error taxonomy and RPC rejection classification.
//!
//! Every failure in the harness falls into one of a small number of classes,
//! and none of them is retried: the harness's job is to surface failures,
//! not to paper over them.
//!
//! - **Setup**: the external migration command failed or deployment
//!   artifacts are unusable. Fatal, aborts the whole run.
//! - **Submission**: the remote node rejected a signed transaction. The
//!   rejection reason is classified from the error message, since the node
//!   (not the harness) is the authority on nonce conflicts and balances.
//! - **Timing**: a bounded receipt poll expired without observing inclusion.
//! - **Assertion**: the final contract state did not match the expectation.
//! - **Transport**: the RPC connection itself failed (distinct from a
//!   well-formed rejection).

use std::time::Duration;

use alloy::primitives::B256;

// ============================================================================
// Submission rejection classification
// ============================================================================

/// Classified node-side rejection reasons for a submitted transaction.
///
/// Different nodes word the same rejection differently, so classification is
/// by message pattern. The harness never retries any of these; the kind is
/// carried so tests can assert on the *reason* for a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorKind {
    /// Nonce already used on chain (duplicate or replayed submission)
    NonceTooLow,
    /// Nonce skips ahead of the account's sequence
    NonceTooHigh,
    /// Sender cannot cover `value + gas_limit * gas_price`
    InsufficientFunds,
    /// Gas price below what the node will accept
    Underpriced,
    /// The node could not decode or validate the raw transaction
    Malformed,
    /// Unclassified rejection
    Unknown,
}

impl SubmissionErrorKind {
    /// Whether this rejection is a nonce conflict (either direction).
    pub fn is_nonce_conflict(&self) -> bool {
        matches!(
            self,
            SubmissionErrorKind::NonceTooLow | SubmissionErrorKind::NonceTooHigh
        )
    }
}

/// Classify a node rejection message into a [`SubmissionErrorKind`].
///
/// Checks multiple phrasings per kind because RPC providers disagree on
/// wording. Order matters: nonce patterns are checked before the generic
/// decode failures they sometimes embed.
pub fn classify_submission_error(message: &str) -> SubmissionErrorKind {
    let msg = message.to_lowercase();

    if msg.contains("nonce too low")
        || msg.contains("nonce is too low")
        || msg.contains("transaction nonce is too low")
        || msg.contains("invalid nonce") && (msg.contains("too low") || msg.contains("expected"))
    {
        return SubmissionErrorKind::NonceTooLow;
    }

    if msg.contains("nonce too high")
        || msg.contains("nonce is too high")
        || msg.contains("nonce gap")
    {
        return SubmissionErrorKind::NonceTooHigh;
    }

    if msg.contains("insufficient funds")
        || msg.contains("insufficient balance")
        || msg.contains("not enough funds")
        || msg.contains("exceeds balance")
    {
        return SubmissionErrorKind::InsufficientFunds;
    }

    if msg.contains("underpriced")
        || msg.contains("gas price too low")
        || msg.contains("max fee per gas less than block base fee")
    {
        return SubmissionErrorKind::Underpriced;
    }

    if msg.contains("rlp")
        || msg.contains("decode")
        || msg.contains("invalid signature")
        || msg.contains("invalid chain id")
        || msg.contains("intrinsic gas too low")
    {
        return SubmissionErrorKind::Malformed;
    }

    SubmissionErrorKind::Unknown
}

/// Check whether an error message indicates a transport-level failure
/// (connection, timeout) rather than a node-side rejection.
pub fn is_transport_error(message: &str) -> bool {
    let msg = message.to_lowercase();
    msg.contains("connection")
        || msg.contains("timeout")
        || msg.contains("network")
        || msg.contains("transport")
        || msg.contains("eof")
        || msg.contains("broken pipe")
}

// ============================================================================
// HarnessError
// ============================================================================

/// Unified error type for the harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Contract migration / artifact loading failed. Fatal.
    #[error("setup failed: {0}")]
    Setup(String),

    /// The remote node rejected a signed transaction.
    #[error("transaction rejected ({kind:?}): {message}")]
    Submission {
        kind: SubmissionErrorKind,
        message: String,
    },

    /// A bounded wait for inclusion expired.
    #[error("no receipt for {tx_hash} after {waited:?}")]
    Timing { tx_hash: B256, waited: Duration },

    /// Final contract state did not match the expectation.
    #[error("assertion failed: expected {expected}, got {actual}")]
    Assertion { expected: String, actual: String },

    /// RPC connection or I/O failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl HarnessError {
    /// Build a [`HarnessError`] from a raw node error, splitting transport
    /// failures from genuine rejections.
    pub fn from_rpc<E: std::fmt::Display>(error: &E) -> Self {
        let message = error.to_string();
        if is_transport_error(&message) {
            return HarnessError::Transport(message);
        }
        HarnessError::Submission {
            kind: classify_submission_error(&message),
            message,
        }
    }

    pub fn is_submission(&self) -> bool {
        matches!(self, HarnessError::Submission { .. })
    }
}

/// Crate-wide result alias.
pub type HarnessResult<T> = Result<T, HarnessError>;

// ============================================================================
// Retry/backoff utilities
// ============================================================================

/// Calculate exponential backoff duration for receipt polling.
///
/// Uses 2^attempt * base_ms, capped at 30 seconds so a long bounded wait
/// never degrades into hammering the endpoint.
///
/// # Examples
/// ```
/// use matchmaker_harness::backoff_duration;
///
/// assert_eq!(backoff_duration(0, 100).as_millis(), 100);
/// assert_eq!(backoff_duration(1, 100).as_millis(), 200);
/// assert_eq!(backoff_duration(2, 100).as_millis(), 400);
/// assert_eq!(backoff_duration(10, 100).as_millis(), 30_000);
/// ```
pub fn backoff_duration(attempt: u32, base_ms: u64) -> Duration {
    let ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(ms.min(30_000))
}
