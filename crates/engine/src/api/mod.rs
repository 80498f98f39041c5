//! API layer - HTTP and WebSocket entry points.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::app::App;

pub mod http;
pub mod relay;
pub mod websocket;

pub use relay::RollBroadcastRelay;

/// The complete router: REST routes, the observer socket and uploaded portraits.
pub fn router(app: Arc<App>) -> Router {
    let ws_state = Arc::new(websocket::WsState {
        relay: app.relay.clone(),
        channel_buffer: app.config.observer_channel_buffer,
    });
    let portraits = ServeDir::new(&app.config.portrait_dir);
    let portrait_prefix = app.config.portrait_url_prefix.clone();

    http::routes(app.config.max_portrait_bytes)
        .with_state(app)
        .route("/ws", get(websocket::ws_handler).with_state(ws_state))
        .nest_service(&portrait_prefix, portraits)
}
