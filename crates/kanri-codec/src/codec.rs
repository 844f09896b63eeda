//! Encode/decode entity files.

use crate::value::FrontMatter;
use kanri_common_core::{Error, Result, Timestamp};
use serde::de::DeserializeOwned;

const FENCE: &str = "---";

/// Split a raw entity file into header and body.
///
/// A file without a leading `---` fence decodes to an empty header and the
/// whole input as body; absence is never an error. A present but malformed
/// header is a `Serialization` error.
pub fn decode(raw: &str) -> Result<(FrontMatter, String)> {
    let Some(rest) = raw.strip_prefix("---\n") else {
        return Ok((FrontMatter::new(), raw.to_string()));
    };

    // Closing fence is a bare `---` line, possibly at end of input.
    let (header_str, body) = match rest.find("\n---\n") {
        Some(idx) => {
            let after = &rest[idx + 5..];
            // One blank line separates fence from body; anything beyond it
            // belongs to the body verbatim.
            let body = after.strip_prefix('\n').unwrap_or(after);
            (&rest[..idx], body)
        }
        None => match rest.strip_suffix("\n---") {
            Some(header) => (header, ""),
            None => return Ok((FrontMatter::new(), raw.to_string())),
        },
    };

    let header: FrontMatter = serde_yaml::from_str(header_str)
        .map_err(|e| Error::Serialization(format!("malformed front-matter header: {e}")))?;
    Ok((header, body.to_string()))
}

/// Assemble a raw entity file from header and body.
///
/// Left inverse of [`decode`] for any header built from [`crate::HeaderValue`]s:
/// `decode(encode(h, b)) == (h, b)`.
pub fn encode(header: &FrontMatter, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(header)
        .map_err(|e| Error::Serialization(format!("failed to encode header: {e}")))?;
    // serde_yaml renders an empty map as `{}`; keep the fence block present
    // either way so the layout stays uniform.
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n\n{body}"))
}

/// Assemble a raw entity file from a typed header record.
///
/// Same framing as [`encode`]; the typed record serializes to the same
/// YAML block an equivalent [`FrontMatter`] would.
pub fn encode_typed<T: serde::Serialize>(header: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(header)
        .map_err(|e| Error::Serialization(format!("failed to encode header: {e}")))?;
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n\n{body}"))
}

/// Decode and type-check the header against a per-kind schema `T`.
///
/// `kind` and `id` name the entity in the error message.
pub fn validate_and_decode<T: DeserializeOwned>(
    kind: &'static str,
    id: &str,
    raw: &str,
) -> Result<(T, String)> {
    let (header, body) = decode(raw)?;
    let typed = typecheck::<T>(kind, id, &header)?;
    Ok((typed, body))
}

/// Merge `patch` over the current header, refresh `updated`, re-validate
/// against `T`, and re-encode. The body is preserved verbatim.
pub fn update<T: DeserializeOwned>(
    kind: &'static str,
    id: &str,
    raw: &str,
    patch: FrontMatter,
) -> Result<String> {
    let (mut header, body) = decode(raw)?;
    header.merge(patch);
    header.insert("updated", Timestamp::now().to_rfc3339());
    typecheck::<T>(kind, id, &header)?;
    encode(&header, &body)
}

fn typecheck<T: DeserializeOwned>(kind: &'static str, id: &str, header: &FrontMatter) -> Result<T> {
    let yaml = serde_yaml::to_string(header)
        .map_err(|e| Error::Serialization(format!("failed to re-encode header: {e}")))?;
    serde_yaml::from_str(&yaml)
        .map_err(|e| Error::schema(kind, id, offending_field(&e), e.to_string()))
}

/// Pull the backticked field name out of a serde_yaml message, falling back
/// to the whole header when the error is not field-shaped.
fn offending_field(err: &serde_yaml::Error) -> String {
    let msg = err.to_string();
    let mut parts = msg.split('`');
    match (parts.next(), parts.next()) {
        (Some(_), Some(field)) if !field.is_empty() => field.to_string(),
        _ => "header".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::HeaderValue;
    use proptest::prelude::*;
    use serde::Deserialize;

    fn sample_header() -> FrontMatter {
        let mut fm = FrontMatter::new();
        fm.insert("name", "Add payment form");
        fm.insert("status", "open");
        fm.insert("parallel", true);
        fm.insert("depends_on", vec!["001".to_string(), "002".to_string()]);
        fm
    }

    #[test]
    fn test_roundtrip() {
        let header = sample_header();
        let body = "## Notes\n\nSome free-form text.\n";
        let raw = encode(&header, body).unwrap();
        let (decoded, decoded_body) = decode(&raw).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded_body, body);
    }

    #[test]
    fn test_roundtrip_empty_header() {
        let header = FrontMatter::new();
        let raw = encode(&header, "just a body").unwrap();
        let (decoded, body) = decode(&raw).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(body, "just a body");
    }

    #[test]
    fn test_decode_without_header() {
        let (header, body) = decode("no front matter here").unwrap();
        assert!(header.is_empty());
        assert_eq!(body, "no front matter here");
    }

    #[test]
    fn test_decode_empty_input() {
        let (header, body) = decode("").unwrap();
        assert!(header.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn test_decode_unterminated_fence_is_body() {
        // An opening fence with no closing fence is not a header.
        let raw = "---\nlooks: like yaml\nbut never closes";
        let (header, body) = decode(raw).unwrap();
        assert!(header.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_decode_malformed_header_fails() {
        let raw = "---\n: [ not yaml\n---\n\nbody";
        assert!(decode(raw).is_err());
    }

    #[test]
    fn test_body_preserved_verbatim() {
        let header = sample_header();
        let body = "line one\n\n\n   indented\n--- not a fence mid-body\n";
        let raw = encode(&header, body).unwrap();
        let (_, decoded_body) = decode(&raw).unwrap();
        assert_eq!(decoded_body, body);
    }

    #[derive(Debug, Deserialize)]
    struct TestHeader {
        name: String,
        status: String,
        #[serde(default)]
        depends_on: Vec<String>,
    }

    #[test]
    fn test_validate_and_decode_ok() {
        let raw = encode(&sample_header(), "body").unwrap();
        let (typed, body) = validate_and_decode::<TestHeader>("task", "001", &raw).unwrap();
        assert_eq!(typed.name, "Add payment form");
        assert_eq!(typed.status, "open");
        assert_eq!(typed.depends_on, vec!["001", "002"]);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_validate_and_decode_names_missing_field() {
        let mut header = sample_header();
        header.remove("status");
        let raw = encode(&header, "body").unwrap();
        let err = validate_and_decode::<TestHeader>("task", "001", &raw).unwrap_err();
        match err {
            Error::SchemaViolation { field, .. } => assert_eq!(field, "status"),
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_update_merges_and_refreshes_updated() {
        let raw = encode(&sample_header(), "the body\n").unwrap();
        let mut patch = FrontMatter::new();
        patch.insert("status", "completed");

        let updated = update::<TestHeader>("task", "001", &raw, patch).unwrap();
        let (header, body) = decode(&updated).unwrap();
        assert_eq!(header.get("status").unwrap().as_str(), Some("completed"));
        assert_eq!(header.get("name").unwrap().as_str(), Some("Add payment form"));
        assert!(header.get("updated").is_some());
        assert_eq!(body, "the body\n");
    }

    #[test]
    fn test_update_rejects_invalid_patch_without_changing_output() {
        let raw = encode(&sample_header(), "body").unwrap();
        let mut patch = FrontMatter::new();
        patch.insert("depends_on", "not-a-list");
        assert!(update::<TestHeader>("task", "001", &raw, patch).is_err());
    }

    fn header_value_strategy() -> impl Strategy<Value = HeaderValue> {
        prop_oneof![
            any::<bool>().prop_map(HeaderValue::Bool),
            // Finite numbers only; YAML has no round-trippable NaN.
            (-1e9f64..1e9f64).prop_map(HeaderValue::Number),
            "[a-zA-Z][a-zA-Z0-9 _.-]{0,20}".prop_map(HeaderValue::String),
            proptest::collection::vec("[a-z0-9-]{1,8}", 0..4).prop_map(HeaderValue::List),
        ]
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            entries in proptest::collection::btree_map(
                "[a-z][a-z_]{0,12}", header_value_strategy(), 0..8),
            body in "[ -~\n]{0,200}",
        ) {
            let header: FrontMatter = entries.into_iter().collect();
            let raw = encode(&header, &body).unwrap();
            let (decoded, decoded_body) = decode(&raw).unwrap();
            prop_assert_eq!(decoded, header);
            prop_assert_eq!(decoded_body, body);
        }
    }
}
