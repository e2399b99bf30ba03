// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Pool delivery metrics.
//
// Emitted through the `metrics` facade; a recorder (Prometheus in the
// binary) decides where they go. Without a recorder these are no-ops.

pub const RECORDS_LOADED: &str = "digi_pool_records_loaded_total";
pub const LOAD_FAILURES: &str = "digi_pool_load_failures_total";
pub const RECORDS_DROPPED: &str = "digi_pool_records_dropped_total";
pub const QUERIES: &str = "digi_pool_queries_total";

/// Register descriptions for the pool metrics.
pub fn describe_pool_metrics() {
    metrics::describe_counter!(RECORDS_LOADED, "Event records written to the lake");
    metrics::describe_counter!(
        LOAD_FAILURES,
        "Batches whose lake write failed and was dropped"
    );
    metrics::describe_counter!(RECORDS_DROPPED, "Event records lost to failed writes");
    metrics::describe_counter!(QUERIES, "Queries issued against a pool");
}

pub(crate) fn record_load(stream: &str, records: usize) {
    metrics::counter!(RECORDS_LOADED, "stream" => stream.to_string()).increment(records as u64);
}

pub(crate) fn record_load_failure(stream: &str, records: usize) {
    metrics::counter!(LOAD_FAILURES, "stream" => stream.to_string()).increment(1);
    metrics::counter!(RECORDS_DROPPED, "stream" => stream.to_string()).increment(records as u64);
}

pub(crate) fn record_query(stream: &str) {
    metrics::counter!(QUERIES, "stream" => stream.to_string()).increment(1);
}
