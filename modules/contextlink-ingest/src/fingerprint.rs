//! Content fingerprints for raw dataset items.
//!
//! A fingerprint is the hex SHA-256 of the payload's canonical JSON form:
//! object keys sorted at every depth, no whitespace. Sorting is done here
//! rather than relying on `serde_json`'s map type, whose ordering flips to
//! insertion order when any crate in the build enables `preserve_order`.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Fingerprint of an arbitrary JSON payload. Logically identical payloads
/// always produce the same value regardless of key order.
pub fn fingerprint(payload: &Value) -> String {
    hex::encode(Sha256::digest(canonical_json(payload).as_bytes()))
}

/// Compact JSON with object keys in lexicographic order.
pub fn canonical_json(payload: &Value) -> String {
    let mut out = String::new();
    write_canonical(payload, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn same_payload_same_fingerprint() {
        let payload = json!({"id": "a", "text": "hello", "likes": 3});
        assert_eq!(fingerprint(&payload), fingerprint(&payload));
        assert_eq!(fingerprint(&payload), fingerprint(&payload.clone()));
    }

    #[test]
    fn key_insertion_order_does_not_matter() {
        let mut forward = Map::new();
        forward.insert("alpha".into(), json!(1));
        forward.insert("beta".into(), json!({"y": 2, "x": [1, {"q": true, "p": null}]}));
        forward.insert("gamma".into(), json!("g"));

        let mut reverse = Map::new();
        reverse.insert("gamma".into(), json!("g"));
        reverse.insert("beta".into(), json!({"x": [1, {"p": null, "q": true}], "y": 2}));
        reverse.insert("alpha".into(), json!(1));

        assert_eq!(
            fingerprint(&Value::Object(forward)),
            fingerprint(&Value::Object(reverse))
        );
    }

    #[test]
    fn fingerprint_is_stable_across_processes() {
        // Pinned value: any change to the canonical form shows up here.
        let payload = json!({"text": "hello", "id": "a"});
        assert_eq!(canonical_json(&payload), r#"{"id":"a","text":"hello"}"#);

        let expected = hex::encode(Sha256::digest(br#"{"id":"a","text":"hello"}"#));
        assert_eq!(fingerprint(&payload), expected);
        assert_eq!(fingerprint(&payload).len(), 64);
    }

    #[test]
    fn varied_payloads_do_not_collide() {
        let payloads = vec![
            json!({"id": "a", "text": "hello"}),
            json!({"id": "b", "text": "world"}),
            json!({"id": "a", "text": "hello "}),
            json!({"id": "a", "text": "Hello"}),
            json!({"id": "a"}),
            json!({"id": "a", "text": null}),
            json!({"id": 1}),
            json!({"id": "1"}),
            json!(["a", "hello"]),
            json!({"nested": {"id": "a", "text": "hello"}}),
            json!({}),
            json!([]),
            json!(null),
        ];
        let mut seen = std::collections::HashSet::new();
        for p in &payloads {
            assert!(seen.insert(fingerprint(p)), "collision for {p}");
        }
    }

    #[test]
    fn array_order_is_significant() {
        assert_ne!(fingerprint(&json!([1, 2])), fingerprint(&json!([2, 1])));
    }

    #[test]
    fn keys_needing_escapes_are_encoded() {
        let payload = json!({"quo\"te": 1, "new\nline": 2});
        assert_eq!(canonical_json(&payload), r#"{"new\nline":2,"quo\"te":1}"#);
    }
}
