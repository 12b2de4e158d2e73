//! Password digest for the Argo challenge-response login.
//!
//! The appliance expects `SHA-1(challenge ":" username ":" password)`
//! rendered as 40 lowercase hex characters.

use sha1::{Digest, Sha1};

/// SHA-1 of the UTF-8 bytes of `message`, as lowercase hex.
pub fn digest_hex(message: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(message.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{b:02x}")).collect()
}

/// Digest submitted to `authenticationManager.login`.
pub fn login_digest(challenge: &str, username: &str, password: &str) -> String {
    digest_hex(&format!("{challenge}:{username}:{password}"))
}
