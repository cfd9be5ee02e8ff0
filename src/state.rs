//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::effects::EffectQueue;
use crate::store::OrderStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub jwt: JwtKeys,
    pub effects: EffectQueue,
}
