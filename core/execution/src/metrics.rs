// redt/core/execution/src/metrics.rs

// Metrics for state transitions and private payload handling
use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram, CounterVec, Histogram};

pub static STATE_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "redt_state_transitions_total",
        "Number of applied messages by outcome",
        &["outcome"]
    )
    .expect("register redt_state_transitions_total")
});

pub static TRANSITION_GAS_USED: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "redt_transition_gas_used",
        "Gas used by applied public messages"
    )
    .expect("register redt_transition_gas_used")
});

pub static PRIVATE_PAYLOAD_RECEIVE_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "redt_private_payload_receive_total",
        "Private payload lookups by result",
        &["result"]
    )
    .expect("register redt_private_payload_receive_total")
});

pub static PRIVACY_VERIFICATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "redt_privacy_verifications_total",
        "Post-execution privacy checks by status",
        &["status"]
    )
    .expect("register redt_privacy_verifications_total")
});
