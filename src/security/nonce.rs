use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::store::Store;

/// Header carrying the request nonce.
pub const NONCE_HEADER: &str = "X-Brain-Nonce";

/// Action every brain mutation is verified against.
pub const BRAIN_ACTION: &str = "kafanek_brain";

/// A nonce lives for one full lifetime, split into two ticks.
const NONCE_LIFETIME_SECS: i64 = 86_400;
const NONCE_LEN: usize = 10;

fn tick_at(now: i64) -> i64 {
    let half = NONCE_LIFETIME_SECS / 2;
    (now + half - 1).div_euclid(half)
}

fn digest(tick: i64, action: &str, user_id: i64, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}|{}", tick, action, user_id, salt).as_bytes());
    let full = hex::encode(hasher.finalize());
    full[..NONCE_LEN].to_string()
}

pub fn create_at(salt: &str, action: &str, user_id: i64, now: i64) -> String {
    digest(tick_at(now), action, user_id, salt)
}

/// Valid for the current tick and the one before it.
pub fn verify_at(salt: &str, action: &str, user_id: i64, nonce: &str, now: i64) -> bool {
    let nonce = nonce.trim();
    if nonce.len() != NONCE_LEN {
        return false;
    }
    let tick = tick_at(now);
    [tick, tick - 1]
        .iter()
        .any(|t| digest(*t, action, user_id, salt) == nonce)
}

fn salt(store: &dyn Store) -> String {
    store.option_get_or("nonce_salt", "")
}

pub fn create(store: &dyn Store, action: &str, user_id: i64) -> String {
    create_at(&salt(store), action, user_id, Utc::now().timestamp())
}

pub fn verify(store: &dyn Store, action: &str, user_id: i64, nonce: &str) -> bool {
    verify_at(&salt(store), action, user_id, nonce, Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &str = "test-salt";
    const NOW: i64 = 1_760_000_000;

    #[test]
    fn nonce_verifies_for_same_user_and_action() {
        let n = create_at(SALT, BRAIN_ACTION, 7, NOW);
        assert_eq!(n.len(), NONCE_LEN);
        assert!(verify_at(SALT, BRAIN_ACTION, 7, &n, NOW));
    }

    #[test]
    fn nonce_is_bound_to_user_action_and_salt() {
        let n = create_at(SALT, BRAIN_ACTION, 7, NOW);
        assert!(!verify_at(SALT, BRAIN_ACTION, 8, &n, NOW));
        assert!(!verify_at(SALT, "other_action", 7, &n, NOW));
        assert!(!verify_at("other-salt", BRAIN_ACTION, 7, &n, NOW));
    }

    #[test]
    fn nonce_survives_one_tick_then_expires() {
        let n = create_at(SALT, BRAIN_ACTION, 7, NOW);
        let half = NONCE_LIFETIME_SECS / 2;
        assert!(verify_at(SALT, BRAIN_ACTION, 7, &n, NOW + half));
        assert!(!verify_at(SALT, BRAIN_ACTION, 7, &n, NOW + 2 * half + 1));
    }

    #[test]
    fn malformed_nonce_is_rejected() {
        assert!(!verify_at(SALT, BRAIN_ACTION, 7, "", NOW));
        assert!(!verify_at(SALT, BRAIN_ACTION, 7, "short", NOW));
    }
}
