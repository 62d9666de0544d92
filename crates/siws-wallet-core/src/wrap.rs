//! `<Bytes>` wrapping for raw message signing
//!
//! Extensions refuse to sign arbitrary bytes that could be a valid extrinsic,
//! so raw payloads are framed as `<Bytes>...</Bytes>` first. Verifiers apply
//! the same framing, so the output here must match it byte for byte.

/// Prefix marking a wrapped payload
pub const WRAP_PREFIX: &[u8] = b"<Bytes>";

/// Postfix marking a wrapped payload
pub const WRAP_POSTFIX: &[u8] = b"</Bytes>";

/// Check if a payload is already wrapped
pub fn is_wrapped(payload: &[u8]) -> bool {
    payload.len() >= WRAP_PREFIX.len() + WRAP_POSTFIX.len()
        && payload.starts_with(WRAP_PREFIX)
        && payload.ends_with(WRAP_POSTFIX)
}

/// Wrap a payload, leaving an already wrapped one untouched
pub fn wrap_bytes(payload: &[u8]) -> Vec<u8> {
    if is_wrapped(payload) {
        return payload.to_vec();
    }

    let mut wrapped = Vec::with_capacity(WRAP_PREFIX.len() + payload.len() + WRAP_POSTFIX.len());
    wrapped.extend_from_slice(WRAP_PREFIX);
    wrapped.extend_from_slice(payload);
    wrapped.extend_from_slice(WRAP_POSTFIX);
    wrapped
}

/// Strip the wrapping, if present
pub fn unwrap_bytes(payload: &[u8]) -> &[u8] {
    if is_wrapped(payload) {
        &payload[WRAP_PREFIX.len()..payload.len() - WRAP_POSTFIX.len()]
    } else {
        payload
    }
}

/// `0x`-prefixed lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
