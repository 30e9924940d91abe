pub mod entries;

pub use entries::*;

use crate::auth::TokenService;
use crate::db::repository::{AccountRepository, EntryRepository};
use std::sync::Arc;

/// Shared application state for handlers
///
/// Everything here is immutable after startup: repositories over the
/// connection pool, the token service holding the injected signing secret,
/// and the hash cost factor. Request handling keeps no other cross-request
/// state.
#[derive(Clone)]
pub struct AppState {
    pub account_repo: Arc<AccountRepository>,
    pub entry_repo: Arc<EntryRepository>,
    pub token_service: Arc<TokenService>,
    pub bcrypt_cost: u32,
}
