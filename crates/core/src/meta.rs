use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde_json::Value;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::php::{self, PhpError};

/// Meta key carrying base64-encoded JSON from the social plugin
pub const SOCIAL_RAW_DATA_KEY: &str = "social_raw_data";

/// Meta key carrying Akismet's spam verdict as a string
pub const AKISMET_RESULT_KEY: &str = "akismet_result";

/// Standard alphabet, with or without trailing `=` padding
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a meta value could not be fully decoded.
///
/// Never fatal: the value it accompanies is the fallback to keep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaDecodeError {
    #[error("meta '{key}' is not valid PHP-serialized data: {source}")]
    PhpSerialized {
        key: String,
        #[source]
        source: PhpError,
    },

    #[error("meta '{key}' is not valid base64: {reason}")]
    Base64 { key: String, reason: String },

    #[error("meta '{key}' decoded from base64 is not JSON: {reason}")]
    Json { key: String, reason: String },
}

impl MetaDecodeError {
    pub fn key(&self) -> &str {
        match self {
            MetaDecodeError::PhpSerialized { key, .. }
            | MetaDecodeError::Base64 { key, .. }
            | MetaDecodeError::Json { key, .. } => key,
        }
    }
}

/// Outcome of decoding one meta value.
///
/// `value` is always usable. When `fallback` is set, `value` is the best
/// effort left after the named decoding step failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Value,
    pub fallback: Option<MetaDecodeError>,
}

impl Decoded {
    fn ok(value: Value) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    fn fallback(value: Value, error: MetaDecodeError) -> Self {
        Self {
            value,
            fallback: Some(error),
        }
    }
}

/// Decode a meta value according to its key
pub fn decode_meta(key: &str, raw: Value, config: &SiteConfig) -> Decoded {
    if key == AKISMET_RESULT_KEY {
        let verdict = raw
            .as_str()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("true"));
        return Decoded::ok(Value::Bool(verdict));
    }

    let Some(text) = raw.as_str() else {
        return Decoded::ok(raw);
    };

    if key == SOCIAL_RAW_DATA_KEY {
        return decode_base64_json(key, text);
    }

    if config.is_php_serialized(key) {
        return match php::unserialize(text) {
            Ok(value) => Decoded::ok(value),
            Err(source) => Decoded::fallback(
                raw,
                MetaDecodeError::PhpSerialized {
                    key: key.to_string(),
                    source,
                },
            ),
        };
    }

    Decoded::ok(raw)
}

fn decode_base64_json(key: &str, text: &str) -> Decoded {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = match BASE64.decode(compact.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Decoded::fallback(
                Value::String(text.to_string()),
                MetaDecodeError::Base64 {
                    key: key.to_string(),
                    reason: e.to_string(),
                },
            )
        }
    };

    let decoded = String::from_utf8_lossy(&bytes).into_owned();

    match serde_json::from_str::<Value>(&decoded) {
        Ok(value) => Decoded::ok(value),
        Err(e) => Decoded::fallback(
            Value::String(decoded),
            MetaDecodeError::Json {
                key: key.to_string(),
                reason: e.to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    fn decode(key: &str, raw: &str) -> Decoded {
        decode_meta(key, json!(raw), &SiteConfig::default())
    }

    #[test]
    fn test_php_serialized_key_is_decoded() {
        let decoded = decode(
            "_wp_attachment_metadata",
            r#"a:2:{s:5:"width";i:800;s:4:"file";s:10:"2015/a.png";}"#,
        );
        assert_eq!(decoded.value, json!({"width": 800, "file": "2015/a.png"}));
        assert!(decoded.fallback.is_none());
    }

    #[test]
    fn test_php_serialized_failure_keeps_raw_string() {
        let decoded = decode("akismet_history", "not serialized at all");
        assert_eq!(decoded.value, json!("not serialized at all"));
        match decoded.fallback {
            Some(MetaDecodeError::PhpSerialized { key, .. }) => assert_eq!(key, "akismet_history"),
            other => panic!("unexpected fallback: {other:?}"),
        }
    }

    #[test]
    fn test_php_serialized_too_deep_keeps_raw_string() {
        let raw = "a:1:{i:0;".repeat(200_000);
        let decoded = decode("_wp_attachment_metadata", &raw);
        assert_eq!(decoded.value, json!(raw));
        match decoded.fallback {
            Some(MetaDecodeError::PhpSerialized { source, .. }) => {
                assert!(matches!(source, PhpError::TooDeep(_)))
            }
            other => panic!("unexpected fallback: {other:?}"),
        }
    }

    #[test]
    fn test_social_raw_data_base64_json() {
        let encoded = STANDARD.encode(r#"{"user":{"name":"Jane"},"id":7}"#);
        let decoded = decode(SOCIAL_RAW_DATA_KEY, &encoded);
        assert_eq!(decoded.value["user"]["name"], json!("Jane"));
        assert_eq!(decoded.value["id"], json!(7));
        assert!(decoded.fallback.is_none());
    }

    #[test]
    fn test_social_raw_data_without_padding() {
        let decoded = decode(SOCIAL_RAW_DATA_KEY, "eyJhIjoxfQ");
        assert_eq!(decoded.value, json!({"a": 1}));
        assert!(decoded.fallback.is_none());

        let decoded = decode(SOCIAL_RAW_DATA_KEY, "eyJhIjoxfQ==");
        assert_eq!(decoded.value, json!({"a": 1}));
        assert!(decoded.fallback.is_none());
    }

    #[test]
    fn test_social_raw_data_non_json_keeps_decoded_string() {
        let encoded = STANDARD.encode("plain words");
        let decoded = decode(SOCIAL_RAW_DATA_KEY, &encoded);
        assert_eq!(decoded.value, json!("plain words"));
        assert!(matches!(decoded.fallback, Some(MetaDecodeError::Json { .. })));
    }

    #[test]
    fn test_social_raw_data_invalid_base64_keeps_raw() {
        let decoded = decode(SOCIAL_RAW_DATA_KEY, "@@not base64@@");
        assert_eq!(decoded.value, json!("@@not base64@@"));
        assert!(matches!(
            decoded.fallback,
            Some(MetaDecodeError::Base64 { .. })
        ));
    }

    #[test]
    fn test_akismet_result_is_boolean() {
        assert_eq!(decode(AKISMET_RESULT_KEY, "true").value, json!(true));
        assert_eq!(decode(AKISMET_RESULT_KEY, "TRUE").value, json!(true));
        assert_eq!(decode(AKISMET_RESULT_KEY, "false").value, json!(false));
        assert_eq!(
            decode_meta(AKISMET_RESULT_KEY, json!({}), &SiteConfig::default()).value,
            json!(false)
        );
    }

    #[test]
    fn test_other_keys_pass_through() {
        let decoded = decode("_edit_last", "3");
        assert_eq!(decoded.value, json!("3"));
        assert!(decoded.fallback.is_none());
    }

    #[test]
    fn test_non_string_value_for_php_key_passes_through() {
        let decoded = decode_meta("akismet_history", json!({}), &SiteConfig::default());
        assert_eq!(decoded.value, json!({}));
        assert!(decoded.fallback.is_none());
    }
}
