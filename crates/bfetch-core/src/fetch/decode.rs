//! Response body decoding.

use serde_json::Value;

use super::{FailureKind, FetchFailure, FetchResult, Payload};

/// Decode a response body into a payload.
///
/// When `pointer` is set (RFC 6901, e.g. `/results/0`), only that sub-document
/// is kept. A `null`, `[]` or `{}` document is the API saying "nothing here"
/// inside a 2xx response and is reported as [`FailureKind::InvalidPayload`].
pub fn decode_payload(body: &[u8], pointer: Option<&str>) -> FetchResult {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        FetchFailure::new(FailureKind::InvalidPayload, format!("malformed JSON: {}", e))
    })?;

    let selected = match pointer {
        Some(p) => value.pointer(p).cloned().ok_or_else(|| {
            FetchFailure::new(
                FailureKind::InvalidPayload,
                format!("pointer {} not present in response", p),
            )
        })?,
        None => value,
    };

    if is_absent(&selected) {
        return Err(FetchFailure::new(
            FailureKind::InvalidPayload,
            "response reports no matching resource",
        ));
    }
    Ok(Payload::new(selected))
}

fn is_absent(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_object() {
        let p = decode_payload(br#"{"name":"Panthera leo","rank":"SPECIES"}"#, None).unwrap();
        assert_eq!(p.value()["rank"], "SPECIES");
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        let err = decode_payload(b"<html>oops</html>", None).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidPayload);
        assert!(err.message.starts_with("malformed JSON"));
    }

    #[test]
    fn empty_documents_are_not_found_in_body() {
        for body in [&b"null"[..], b"[]", b"{}", b"  [ ]  "] {
            let err = decode_payload(body, None).unwrap_err();
            assert_eq!(err.kind, FailureKind::InvalidPayload);
        }
    }

    #[test]
    fn pointer_selects_sub_document() {
        let body = br#"{"count":1,"results":[{"id":7,"name":"x"}]}"#;
        let p = decode_payload(body, Some("/results/0")).unwrap();
        assert_eq!(p.value(), &json!({"id": 7, "name": "x"}));
    }

    #[test]
    fn pointer_to_missing_or_empty_target_fails() {
        let body = br#"{"count":0,"results":[]}"#;
        let missing = decode_payload(body, Some("/results/0")).unwrap_err();
        assert_eq!(missing.kind, FailureKind::InvalidPayload);
        assert!(missing.message.contains("/results/0"));
        let empty = decode_payload(body, Some("/results")).unwrap_err();
        assert_eq!(empty.kind, FailureKind::InvalidPayload);
    }

    #[test]
    fn scalars_are_payloads() {
        let p = decode_payload(b"42", None).unwrap();
        assert_eq!(p.value(), &json!(42));
    }
}
