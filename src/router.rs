use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes.
/// The frontend bundle is only served when `frontend_dir` is given.
pub fn build(state: Arc<AppState>, frontend_dir: Option<&str>) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Switch inventory routes
        .route(
            "/api/switches",
            get(handlers::switches::list_switches).post(handlers::switches::create_switch),
        )
        .route(
            "/api/switches/:id",
            get(handlers::switches::get_switch)
                .put(handlers::switches::update_switch)
                .delete(handlers::switches::delete_switch),
        )
        .route("/api/switches/:id/refresh", post(handlers::switches::refresh_switch))
        // VLAN routes
        .route("/api/vlans", get(handlers::vlans::list_all_vlans))
        .route(
            "/api/vlans/:switch_id",
            get(handlers::vlans::list_switch_vlans).post(handlers::vlans::create_vlan),
        )
        .route(
            "/api/vlans/:switch_id/:vlan_id",
            axum::routing::delete(handlers::vlans::delete_vlan),
        )
        // VXLAN routes
        .route("/api/vxlans", get(handlers::vxlans::list_all_vxlans))
        .route(
            "/api/vxlans/:switch_id",
            get(handlers::vxlans::list_switch_vxlans).post(handlers::vxlans::create_vxlan),
        )
        .route(
            "/api/vxlans/:switch_id/:vni",
            axum::routing::delete(handlers::vxlans::delete_vxlan),
        )
        // Tunnel routes
        .route("/api/tunnels", get(handlers::tunnels::list_all_tunnels))
        .route("/api/tunnels/switches", get(handlers::tunnels::list_tunnel_switches))
        .route("/api/tunnels/preview", post(handlers::tunnels::preview_tunnel))
        .route("/api/tunnels/create", post(handlers::tunnels::create_tunnel))
        .route("/api/tunnels/:switch_id", get(handlers::tunnels::list_switch_tunnels));

    if let Some(dir) = frontend_dir {
        router = router
            .nest_service("/assets", ServeDir::new(format!("{}/assets", dir)))
            .fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(format!("{}/index.html", dir))),
            );
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
