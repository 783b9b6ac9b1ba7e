use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::eapi::{commands, queries};
use crate::models::*;
use crate::utils::{is_valid_vlan_name, validate_vlan_id};
use crate::AppState;

use super::extract::{JsonBody, PathParams};
use super::{created, fan_out, load_switch, ApiError, ConfigResponse};

/// List VLANs across every switch in the inventory
pub async fn list_all_vlans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VlanListResponse>, ApiError> {
    let switches = state.store.list_switches().await?;
    let (vlans, errors) = fan_out(switches, |sw| {
        let connector = state.connector.clone();
        async move {
            let runner = connector.connect(&sw)?;
            queries::show_vlans(runner.as_ref(), &sw).await
        }
    })
    .await;
    Ok(Json(VlanListResponse { vlans, errors }))
}

/// List VLANs on one switch
pub async fn list_switch_vlans(
    State(state): State<Arc<AppState>>,
    PathParams(switch_id): PathParams<String>,
) -> Result<Json<Vec<Vlan>>, ApiError> {
    let switch = load_switch(&state, &switch_id).await?;
    let runner = state.connector.connect(&switch)?;
    let vlans = queries::show_vlans(runner.as_ref(), &switch).await?;
    Ok(Json(vlans))
}

/// Create a VLAN on a switch
pub async fn create_vlan(
    State(state): State<Arc<AppState>>,
    PathParams(switch_id): PathParams<String>,
    JsonBody(req): JsonBody<CreateVlanRequest>,
) -> Result<(StatusCode, Json<ConfigResponse>), ApiError> {
    let vlan_id = req
        .vlan_id
        .and_then(validate_vlan_id)
        .ok_or_else(|| ApiError::bad_request("vlanId must be between 1 and 4094"))?;
    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if let Some(name) = name {
        if !is_valid_vlan_name(name) {
            return Err(ApiError::bad_request("VLAN name must be 1-32 characters without spaces"));
        }
    }

    let switch = load_switch(&state, &switch_id).await?;
    let cmds = commands::create_vlan(vlan_id, name);
    let runner = state.connector.connect(&switch)?;
    queries::apply(runner.as_ref(), &cmds).await?;

    tracing::info!("Created VLAN {} on {}", vlan_id, switch.display_name());
    Ok(created(ConfigResponse {
        message: format!("VLAN {} created", vlan_id),
        switch_id: switch.id,
        commands: cmds,
    }))
}

/// Delete a VLAN from a switch
pub async fn delete_vlan(
    State(state): State<Arc<AppState>>,
    PathParams((switch_id, vlan_id)): PathParams<(String, i64)>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let vlan_id = validate_vlan_id(vlan_id)
        .ok_or_else(|| ApiError::bad_request("vlanId must be between 1 and 4094"))?;

    let switch = load_switch(&state, &switch_id).await?;
    let cmds = commands::delete_vlan(vlan_id);
    let runner = state.connector.connect(&switch)?;
    queries::apply(runner.as_ref(), &cmds).await?;

    tracing::info!("Deleted VLAN {} on {}", vlan_id, switch.display_name());
    Ok(Json(ConfigResponse {
        message: format!("VLAN {} deleted", vlan_id),
        switch_id: switch.id,
        commands: cmds,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_vlan_rejects_out_of_range() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;

        for bad in [0, 4095, -1] {
            let (status, body) = send(
                &app.router,
                "POST",
                &format!("/api/vlans/{}", sw.id),
                Some(json!({"vlanId": bad, "name": "X"})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "vlanId {}", bad);
            assert_eq!(body["error"], "vlanId must be between 1 and 4094");
        }
        assert!(app.fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_vlan_pushes_commands() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;

        let (status, body) = send(
            &app.router,
            "POST",
            &format!("/api/vlans/{}", sw.id),
            Some(json!({"vlanId": 10, "name": "TENANT_A"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["switchId"], sw.id.as_str());

        let calls = app.fake.calls_to("10.0.0.1");
        assert_eq!(calls, vec![vec!["enable", "configure", "vlan 10", "name TENANT_A", "end"]]);
    }

    #[tokio::test]
    async fn test_create_vlan_unknown_switch_is_404() {
        let app = test_app().await;
        let (status, _) = send(
            &app.router,
            "POST",
            "/api/vlans/nope",
            Some(json!({"vlanId": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_vlan_remote_rejection_is_500() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;
        app.fake.fail_on("10.0.0.1", "vlan 10", "VLAN creation failed");

        let (status, body) = send(
            &app.router,
            "POST",
            &format!("/api/vlans/{}", sw.id),
            Some(json!({"vlanId": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("VLAN creation failed"));
    }

    #[tokio::test]
    async fn test_delete_vlan() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;

        let (status, _) = send(&app.router, "DELETE", &format!("/api/vlans/{}/20", sw.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            app.fake.calls_to("10.0.0.1"),
            vec![vec!["enable", "configure", "no vlan 20", "end"]]
        );

        let (status, _) = send(&app.router, "DELETE", &format!("/api/vlans/{}/5000", sw.id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_all_vlans_collects_errors() {
        let app = test_app().await;
        seed_switch(&app, "leaf1", "10.0.0.1").await;
        seed_switch(&app, "leaf2", "10.0.0.2").await;
        app.fake.respond(
            "10.0.0.1",
            "show vlan",
            json!({"vlans": {"1": {"name": "default", "status": "active", "interfaces": {}}}}),
        );
        app.fake.fail_on("10.0.0.2", "show vlan", "connection refused");

        let (status, body) = send(&app.router, "GET", "/api/vlans", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vlans"].as_array().unwrap().len(), 1);
        assert_eq!(body["vlans"][0]["hostname"], "leaf1");
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
        assert_eq!(body["errors"][0]["hostname"], "leaf2");
    }

    #[tokio::test]
    async fn test_create_vlan_form_style_ids() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;
        let uri = format!("/api/vlans/{}", sw.id);

        let (status, body) = send(&app.router, "POST", &uri, Some(json!({"vlanId": "5000"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "vlanId must be between 1 and 4094");

        let (status, body) = send(&app.router, "POST", &uri, Some(json!({"vlanId": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "vlanId must be between 1 and 4094");

        let (status, _) = send(&app.router, "POST", &uri, Some(json!({"vlanId": "10"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            app.fake.calls_to("10.0.0.1"),
            vec![vec!["enable", "configure", "vlan 10", "end"]]
        );
    }

    #[tokio::test]
    async fn test_create_vlan_unrepresentable_id_is_400_json() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;

        let (status, body) = send(
            &app.router,
            "POST",
            &format!("/api/vlans/{}", sw.id),
            Some(json!({"vlanId": 1e20})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
        assert!(app.fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_vlan_non_numeric_path_is_400_json() {
        let app = test_app().await;
        let sw = seed_switch(&app, "leaf1", "10.0.0.1").await;

        let (status, body) = send(&app.router, "DELETE", &format!("/api/vlans/{}/ten", sw.id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid path"));
    }
}
