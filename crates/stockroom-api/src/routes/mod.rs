//! API routes
//!
//! The public/protected split is explicit per route: handlers taking a
//! `RequireAuth` argument sit behind the bearer-token gate, everything
//! else is public.

mod admins;
mod auth;
mod health;
mod products;
mod types;
mod uploads;

use axum::Router;

use crate::state::AppState;

#[allow(unused_imports)]
pub use auth::RequireAuth;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(admins::routes())
        .merge(products::routes())
        .merge(uploads::routes())
        .with_state(state)
}
