use crate::state::AppState;
use axum::Router;

mod dto;
pub mod error;
pub mod handlers;
pub mod mailing_list;
pub mod provider;
pub mod repo;
pub mod repo_types;
pub mod services;

use provider::Provider;

pub fn router(provider: Provider) -> Router<AppState> {
    handlers::offer_routes(provider)
}
