// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Event Records
//!
//! Schemaless event documents and the ingestion-time stamping rule.
//!
//! After stamping, `ts` is always the ingestion time. A producer-supplied
//! `ts` survives verbatim under `event_ts`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Field carrying the ingestion timestamp.
pub const TS_FIELD: &str = "ts";

/// Field a producer-supplied `ts` is moved to.
pub const EVENT_TS_FIELD: &str = "event_ts";

/// An open key-value event document. Key order is preserved.
pub type EventRecord = Map<String, Value>;

/// Render an ingestion timestamp (RFC 3339, UTC, microseconds).
pub fn ingestion_timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Apply the `ts` / `event_ts` rewrite to a single record.
///
/// An existing `ts` is renamed in place to `event_ts`, replacing any older
/// `event_ts`; the new `ts` is appended last.
pub fn stamp(record: &mut EventRecord, ts: &Value) {
    if record.contains_key(TS_FIELD) {
        let fields = std::mem::take(record);
        for (key, value) in fields {
            match key.as_str() {
                TS_FIELD => {
                    record.insert(EVENT_TS_FIELD.to_string(), value);
                }
                EVENT_TS_FIELD => {}
                _ => {
                    record.insert(key, value);
                }
            }
        }
    }
    record.insert(TS_FIELD.to_string(), ts.clone());
}

/// Stamp every record of a batch with the same timestamp.
pub fn stamp_batch(records: &mut [EventRecord], ts: &Value) {
    for record in records.iter_mut() {
        stamp(record, ts);
    }
}

/// Encode a batch as concatenated compact JSON documents, no separators.
pub fn encode_batch(records: &[EventRecord]) -> Result<String, serde_json::Error> {
    let mut data = String::new();
    for record in records {
        data.push_str(&serde_json::to_string(record)?);
    }
    Ok(data)
}

/// Convert arbitrary JSON into event records.
///
/// Accepts a single object or an array of objects; anything else yields `None`.
pub fn records_from_value(value: Value) -> Option<Vec<EventRecord>> {
    match value {
        Value::Object(map) => Some(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(value: Value) -> EventRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_producer_ts_moves_to_event_ts() {
        let mut r = record(json!({"ts": 100, "val": "a"}));
        stamp(&mut r, &json!("T"));
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"event_ts":100,"val":"a","ts":"T"}"#
        );
    }

    #[test]
    fn test_record_without_ts_gets_one() {
        let mut r = record(json!({"val": "a"}));
        stamp(&mut r, &json!("T"));
        assert_eq!(r.get("ts"), Some(&json!("T")));
        assert!(r.get("event_ts").is_none());
    }

    #[test]
    fn test_stale_event_ts_is_replaced() {
        let mut r = record(json!({"val": "a", "ts": 5, "event_ts": 1}));
        stamp(&mut r, &json!("T"));
        assert_eq!(r.get("event_ts"), Some(&json!(5)));
        assert_eq!(r.len(), 3);

        let mut r = record(json!({"event_ts": 1, "ts": 5}));
        stamp(&mut r, &json!("T"));
        assert_eq!(r.get("event_ts"), Some(&json!(5)));
    }

    #[test]
    fn test_event_ts_without_ts_is_untouched() {
        let mut r = record(json!({"event_ts": 1}));
        stamp(&mut r, &json!("T"));
        assert_eq!(r.get("event_ts"), Some(&json!(1)));
    }

    #[test]
    fn test_batch_shares_one_timestamp() {
        let mut batch = vec![
            record(json!({"a": 1})),
            record(json!({"ts": "x"})),
            record(json!({"ts": null, "b": 2})),
        ];
        stamp_batch(&mut batch, &json!("T"));
        assert!(batch.iter().all(|r| r.get("ts") == Some(&json!("T"))));
        assert_eq!(batch[1].get("event_ts"), Some(&json!("x")));
        assert_eq!(batch[2].get("event_ts"), Some(&Value::Null));
    }

    #[test]
    fn test_encode_batch_is_newline_free() {
        let batch = vec![record(json!({"a": 1})), record(json!({"b": "x\ny"}))];
        let data = encode_batch(&batch).unwrap();
        assert_eq!(data, r#"{"a":1}{"b":"x\ny"}"#);
        assert!(!data.contains('\n'));
    }

    #[test]
    fn test_ingestion_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(ingestion_timestamp(at), json!("2026-10-19T12:00:00.000000Z"));
    }

    #[test]
    fn test_records_from_value() {
        assert_eq!(records_from_value(json!({"a": 1})).unwrap().len(), 1);
        assert_eq!(records_from_value(json!([{"a": 1}, {"b": 2}])).unwrap().len(), 2);
        assert!(records_from_value(json!([{"a": 1}, 3])).is_none());
        assert!(records_from_value(json!("x")).is_none());
    }
}
