use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::models::user::{Capability, User};
use crate::security::nonce::{self, BRAIN_ACTION, NONCE_HEADER};
use crate::store::Store;

// ── Authenticated user guard (any user with a valid API key) ──

/// Guard: any user presenting a valid `Authorization: Bearer <key>`.
/// Role-specific guards below layer capability checks on top.
pub struct AuthenticatedUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match resolve_api_user(request).await {
            Some(user) => Outcome::Success(AuthenticatedUser { user }),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

// ── Capability guards ──

/// Guard: requires `edit_posts` (contributor and above)
pub struct WriterUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for WriterUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match resolve_api_user(request).await {
            Some(user) if user.can(Capability::EditPosts) => {
                Outcome::Success(WriterUser { user })
            }
            Some(_) => Outcome::Error((Status::Forbidden, ())),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// Guard: requires `manage_options` (administrator)
pub struct AdminUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match resolve_api_user(request).await {
            Some(user) if user.can(Capability::ManageOptions) => {
                Outcome::Success(AdminUser { user })
            }
            Some(_) => Outcome::Error((Status::Forbidden, ())),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

// ── Nonce guard ──

/// Guard: the `X-Brain-Nonce` header must match the caller and the brain
/// action. Place it after a user guard so auth failures report 401 first.
pub struct VerifiedNonce;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for VerifiedNonce {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user = match resolve_api_user(request).await {
            Some(u) => u,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };
        let store = match request.guard::<&State<Arc<dyn Store>>>().await.succeeded() {
            Some(s) => s,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };
        let supplied = request.headers().get_one(NONCE_HEADER).unwrap_or("");

        if nonce::verify(&**store.inner(), BRAIN_ACTION, user.id, supplied) {
            Outcome::Success(VerifiedNonce)
        } else {
            log::warn!("[auth] rejected nonce for user {}", user.id);
            Outcome::Error((Status::Forbidden, ()))
        }
    }
}

// ── Shared key resolution ──

/// Look up the bearer key once per request; later guards reuse the result.
async fn resolve_api_user(request: &Request<'_>) -> Option<User> {
    let cached: &Option<User> = request
        .local_cache_async(async {
            let store = request
                .guard::<&State<Arc<dyn Store>>>()
                .await
                .succeeded()?;
            let key = bearer_token(request.headers().get_one("Authorization")?)?;
            store.user_get_by_api_key(&hash_api_key(key))
        })
        .await;
    cached.clone()
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

// ── API key utilities ──

pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.trim().as_bytes());
    hex::encode(hasher.finalize())
}
