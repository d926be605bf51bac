//! Two-phase admission: submit and seed a poll in pre-processing, collect the verdict in
//! post-processing.
//!
//! Per transaction hash the coordinator moves through
//! `Unseen -> Submitted -> AwaitingResult -> Resolved`. Every failure along the way resolves to
//! inclusion; only an explicit rejection from the sidecar keeps a transaction out of the block.

use std::{
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use alloy_primitives::B256;
use dashmap::DashMap;
use parking_lot::Mutex;
use sidecar_client::{
    PendingCall,
    SidecarClient,
    SidecarClientError,
    WaitError,
};
use sidecar_model::{
    CandidateTransaction,
    EncodingError,
    api::{
        GET_TRANSACTIONS,
        GetTransactionsRequest,
        GetTransactionsResponse,
        SEND_TRANSACTIONS,
        SendTransactionsRequest,
        SendTransactionsResponse,
        TransactionStatus,
    },
    encode_transaction,
    encode_transaction_or_minimal,
    transaction_type_name,
};
use tracing::{
    debug,
    info,
    instrument,
    warn,
};

use crate::{
    config::AdmissionConfig,
    metrics,
};

/// Reason hosts should attach to an excluded transaction.
pub const REJECTION_REASON: &str = "tx rejected by sidecar";

/// How often pre-processing may trigger a sweep of expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Result of pre-processing. Pre-processing never excludes; this only reports what was set up.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// The transaction was submitted and a poll is in flight.
    Seeded,
    /// As `Seeded`, and an older live entry for the same hash was discarded.
    Replaced,
    /// The transaction could not be encoded; nothing was sent.
    EncodeFailed(EncodingError),
    /// The submit failed; no poll was seeded.
    SubmitFailed(SidecarClientError),
    /// The credible layer is turned off.
    Disabled,
}

impl SeedOutcome {
    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded | Self::Replaced)
    }
}

/// Why a transaction was included.
#[derive(Debug, Clone, PartialEq)]
pub enum InclusionReason {
    Disabled,
    /// Post-processing found nothing to wait on.
    NoPendingRequest,
    PollTimedOut(Duration),
    /// The poll's task ended without producing a result.
    PollAbandoned,
    SidecarError(SidecarClientError),
    /// The sidecar answered with no results at all.
    NoResults,
    /// Results were returned but none for this hash.
    NotFound,
    /// The sidecar's verdict does not reject the transaction.
    Accepted(TransactionStatus),
}

impl InclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::NoPendingRequest => "no_pending_request",
            Self::PollTimedOut(_) => "timeout",
            Self::PollAbandoned => "abandoned",
            Self::SidecarError(SidecarClientError::Transport(_)) => "transport_error",
            Self::SidecarError(SidecarClientError::Rpc { .. }) => "rpc_error",
            Self::SidecarError(SidecarClientError::Decode(_)) => "decode_error",
            Self::SidecarError(SidecarClientError::Encoding(_)) => "encoding_error",
            Self::NoResults => "no_results",
            Self::NotFound => "not_found",
            Self::Accepted(_) => "accepted",
        }
    }

    /// True when the sidecar actually gave a verdict, rather than the policy failing open.
    pub fn is_verdict(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionDecision {
    Included(InclusionReason),
    Excluded {
        status: TransactionStatus,
        error: Option<String>,
    },
}

impl AdmissionDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Included(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Included(_) => "included",
            Self::Excluded { .. } => "excluded",
        }
    }

    pub fn reason_label(&self) -> &'static str {
        match self {
            Self::Included(reason) => reason.label(),
            Self::Excluded { status, .. } => status.as_str(),
        }
    }
}

/// The fail-open policy. Maps every possible poll outcome to a decision; only a result for
/// `hash` whose status is a rejection excludes.
pub fn decide(
    hash: &B256,
    outcome: Result<GetTransactionsResponse, WaitError>,
) -> AdmissionDecision {
    let response = match outcome {
        Ok(response) => response,
        Err(WaitError::Timeout(waited)) => {
            return AdmissionDecision::Included(InclusionReason::PollTimedOut(waited));
        }
        Err(WaitError::Abandoned) => {
            return AdmissionDecision::Included(InclusionReason::PollAbandoned);
        }
        Err(WaitError::Call(err)) => {
            return AdmissionDecision::Included(InclusionReason::SidecarError(err));
        }
    };

    if response.results.is_empty() {
        return AdmissionDecision::Included(InclusionReason::NoResults);
    }

    match response.find(hash) {
        Some(result) if result.status.is_rejection() => {
            AdmissionDecision::Excluded {
                status: result.status,
                error: result.error.clone(),
            }
        }
        Some(result) => AdmissionDecision::Included(InclusionReason::Accepted(result.status)),
        None => AdmissionDecision::Included(InclusionReason::NotFound),
    }
}

#[derive(Debug)]
struct PendingAdmission {
    poll: PendingCall<GetTransactionsResponse>,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    poll_timeout: Duration,
    submit_timeout: Duration,
    pending_ttl: Duration,
    encode_fallback: bool,
}

/// Drives the submit-then-poll protocol for transactions offered to the block builder.
///
/// Safe to share between block-building threads. Entries are keyed by transaction hash and
/// removed exactly once: by the post-processing call that wins the `remove`, or by a TTL sweep
/// when post-processing never happens.
#[derive(Debug)]
pub struct AdmissionCoordinator {
    client: Arc<SidecarClient>,
    pending: DashMap<B256, PendingAdmission>,
    settings: Settings,
    last_sweep: Mutex<Instant>,
}

impl AdmissionCoordinator {
    pub fn new(client: Arc<SidecarClient>, config: &AdmissionConfig) -> Self {
        Self {
            client,
            pending: DashMap::new(),
            settings: Settings {
                poll_timeout: config.poll_timeout,
                submit_timeout: config.submit_timeout,
                pending_ttl: config.pending_ttl,
                encode_fallback: config.encode_fallback,
            },
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Number of transactions awaiting post-processing.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, hash: &B256) -> bool {
        self.pending.contains_key(hash)
    }

    /// Submit `tx` to the sidecar and start polling for its verdict.
    #[instrument(
        name = "credible_admission::pre_process",
        skip_all,
        fields(tx_hash = %tx.tx_hash(), tx_type = transaction_type_name(tx.tx_type())),
        level = "debug"
    )]
    pub fn pre_process<T>(&self, tx: &T) -> SeedOutcome
    where
        T: CandidateTransaction + ?Sized,
    {
        self.maybe_sweep();

        let hash = tx.tx_hash();
        let tx_env = if self.settings.encode_fallback {
            encode_transaction_or_minimal(tx)
        } else {
            match encode_transaction(tx) {
                Ok(tx_env) => tx_env,
                Err(err) => {
                    warn!(tx_hash = %hash, error = %err, "Failed to encode transaction, skipping sidecar");
                    metrics::record_encode_failure();
                    return SeedOutcome::EncodeFailed(err);
                }
            }
        };

        let request = SendTransactionsRequest::single(tx_env, hash);
        match self.client.call_timeout::<_, SendTransactionsResponse>(
            SEND_TRANSACTIONS,
            &request,
            self.settings.submit_timeout,
        ) {
            Ok(response) if response.is_failed(&hash) => {
                warn!(tx_hash = %hash, "Sidecar reported transaction submit as failed");
            }
            Ok(_) => debug!(tx_hash = %hash, "Transaction submitted to sidecar"),
            Err(err) => {
                warn!(tx_hash = %hash, error = %err, "Failed to submit transaction to sidecar");
                metrics::record_submit_failure();
                return SeedOutcome::SubmitFailed(err);
            }
        }

        let poll = self
            .client
            .call_async(GET_TRANSACTIONS, GetTransactionsRequest::single(hash));
        let entry = PendingAdmission {
            poll,
            created_at: Instant::now(),
        };

        if self.pending.insert(hash, entry).is_some() {
            warn!(tx_hash = %hash, "Replaced a pending sidecar request for the same transaction");
            metrics::record_pending_replaced();
            SeedOutcome::Replaced
        } else {
            SeedOutcome::Seeded
        }
    }

    /// Collect the verdict for `hash`, waiting at most the poll timeout.
    #[instrument(
        name = "credible_admission::post_process",
        skip(self),
        fields(tx_hash = %hash),
        level = "debug"
    )]
    pub fn post_process(&self, hash: B256) -> AdmissionDecision {
        let decision = match self.pending.remove(&hash) {
            None => AdmissionDecision::Included(InclusionReason::NoPendingRequest),
            Some((_, pending)) => {
                let _wait = metrics::PollWaitDuration::start();
                decide(&hash, pending.poll.wait_timeout(self.settings.poll_timeout))
            }
        };

        match &decision {
            AdmissionDecision::Excluded { status, error } => {
                info!(tx_hash = %hash, %status, error = ?error, "Transaction rejected by sidecar");
            }
            AdmissionDecision::Included(InclusionReason::Accepted(status)) => {
                debug!(tx_hash = %hash, %status, "Sidecar accepted transaction");
            }
            AdmissionDecision::Included(reason) => {
                warn!(tx_hash = %hash, reason = reason.label(), detail = ?reason, "Including transaction without a sidecar verdict");
            }
        }
        metrics::record_decision(&decision);
        decision
    }

    /// Drop entries older than the pending TTL. Returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let ttl = self.settings.pending_ttl;
        let mut expired = 0usize;
        self.pending.retain(|hash, pending| {
            let keep = pending.created_at.elapsed() <= ttl;
            if !keep {
                debug!(tx_hash = %hash, "Dropping expired pending sidecar request");
                expired += 1;
            }
            keep
        });

        if expired > 0 {
            warn!(expired, "Dropped pending sidecar requests that were never post-processed");
            metrics::record_pending_expired(expired as u64);
        }
        expired
    }

    fn maybe_sweep(&self) {
        let Some(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if last_sweep.elapsed() < SWEEP_INTERVAL {
            return;
        }
        *last_sweep = Instant::now();
        drop(last_sweep);

        self.sweep_expired();
    }
}
