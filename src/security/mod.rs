pub mod auth;
pub mod nonce;

use rand::RngCore;

/// `bytes` random bytes, hex encoded.
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Mint a new API key: `kb_` followed by 48 hex chars.
pub fn generate_api_key() -> String {
    format!("kb_{}", random_hex(24))
}
