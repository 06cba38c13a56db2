#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use serde_json::{json, Value};

mod ai;
mod boot;
mod copywriter;
mod db;
mod greeting;
mod models;
mod rate_limit;
mod routes;
mod security;
mod store;


use ai::{ProviderChain, TextGenerator};
use rate_limit::RateLimiter;
use store::Store;

/// Every route lives under this prefix.
pub const MOUNT_POINT: &str = "/brain";

fn error_body(status: u16, message: &str) -> Json<Value> {
    Json(json!({"ok": false, "status": status, "error": message}))
}

#[catch(400)]
fn bad_request() -> Json<Value> {
    error_body(400, "Malformed request")
}

#[catch(401)]
fn unauthorized() -> Json<Value> {
    error_body(401, "Missing or invalid API key")
}

#[catch(403)]
fn forbidden() -> Json<Value> {
    error_body(403, "You are not allowed to do this, or the nonce has expired")
}

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    error_body(404, &format!("No route for {}", req.uri().path()))
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    error_body(422, "Request body could not be parsed")
}

#[catch(429)]
fn too_many_requests() -> Json<Value> {
    error_body(429, "Too many requests. Please wait before trying again.")
}

#[catch(500)]
fn server_error() -> Json<Value> {
    error_body(500, "Internal server error")
}

/// Assemble the application around a store and a text generator.
pub fn build_rocket(store: Arc<dyn Store>, generator: Arc<dyn TextGenerator>) -> Rocket<Build> {
    rocket::build()
        .manage(store)
        .manage(generator)
        .manage(RateLimiter::new())
        .mount(MOUNT_POINT, routes::routes())
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                unprocessable,
                too_many_requests,
                server_error
            ],
        )
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let store = boot::run();
    let generator: Arc<dyn TextGenerator> = Arc::new(ProviderChain::new(Arc::clone(&store)));

    if !ai::is_enabled(&*store) {
        log::warn!("No AI provider is enabled; generation will fail until one is configured");
    }
    log::info!("Brain API mounted at {}", MOUNT_POINT);

    build_rocket(store, generator)
}
