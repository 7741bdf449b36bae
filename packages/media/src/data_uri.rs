use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode bytes as an RFC 2397 `data:` URI, e.g. `data:image/jpeg;base64,...`.
pub fn encode_data_uri(content_type: &str, data: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(data))
}
