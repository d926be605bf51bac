use metrics::{
    counter,
    histogram,
};
use std::time::Instant;

use crate::admission::AdmissionDecision;

/// Records how long post-processing waited on a poll.
pub(crate) struct PollWaitDuration {
    start: Instant,
}

impl PollWaitDuration {
    pub(crate) fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Drop for PollWaitDuration {
    fn drop(&mut self) {
        histogram!("credible_admission_poll_wait_seconds").record(self.start.elapsed());
    }
}

pub(crate) fn record_decision(decision: &AdmissionDecision) {
    counter!(
        "credible_admission_decisions_total",
        "decision" => decision.label(),
        "reason" => decision.reason_label(),
    )
    .increment(1);
}

pub(crate) fn record_encode_failure() {
    counter!("credible_admission_encode_failures_total").increment(1);
}

pub(crate) fn record_submit_failure() {
    counter!("credible_admission_submit_failures_total").increment(1);
}

pub(crate) fn record_pending_replaced() {
    counter!("credible_admission_pending_replaced_total").increment(1);
}

pub(crate) fn record_pending_expired(expired: u64) {
    counter!("credible_admission_pending_expired_total").increment(expired);
}

pub(crate) fn record_block_env_push(outcome: &'static str) {
    counter!("credible_block_env_pushes_total", "outcome" => outcome).increment(1);
}
