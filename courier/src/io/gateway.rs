//! Remote route API contract and its HTTP adapter.
//!
//! The [`SyncGateway`] trait decouples the session from the transport. The
//! production adapter speaks JSON over HTTP with a bearer credential on every
//! call; tests use [`ScriptedGateway`](crate::test_support::ScriptedGateway).

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use jsonschema::{Validator, validator_for};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::io::config::CourierConfig;
use crate::io::credential::Credential;
use crate::route::{Route, RouteId, RouteStatus, Stop, StopId, StopStatus};

const ROUTE_DETAIL_SCHEMA: &str = include_str!("../../schemas/route_detail.schema.json");

/// Route detail validator, compiled once from the embedded schema.
static ROUTE_DETAIL_VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    let schema: Value = serde_json::from_str(ROUTE_DETAIL_SCHEMA)
        .map_err(|err| format!("parse route schema: {err}"))?;
    validator_for(&schema).map_err(|err| format!("invalid route schema: {err}"))
});

/// Remote read/mutate operations a route session needs.
///
/// Mutations report success or failure only; callers re-fetch the route for
/// the authoritative state.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    async fn fetch_route(&self, route_id: RouteId) -> Result<Route>;

    /// Create a stop and return its id.
    async fn add_stop(&self, route_id: RouteId, address_text: &str) -> Result<StopId>;

    async fn delete_stop(&self, route_id: RouteId, stop_id: StopId) -> Result<()>;

    async fn set_stop_status(
        &self,
        route_id: RouteId,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<()>;

    async fn set_route_status(&self, route_id: RouteId, status: RouteStatus) -> Result<()>;
}

/// `GET /routes/{id}` body.
#[derive(Debug, Deserialize)]
struct RouteDetail {
    route_name: String,
    route_status: RouteStatus,
    #[serde(default)]
    start_lat: Option<f64>,
    #[serde(default)]
    start_lng: Option<f64>,
    #[serde(default)]
    start_address: Option<String>,
    #[serde(default)]
    total_distance_meters: Option<f64>,
    #[serde(default)]
    total_duration_seconds: Option<f64>,
    #[serde(default)]
    overview_polyline: Option<String>,
    stops: Vec<Stop>,
}

impl RouteDetail {
    fn into_route(self, id: RouteId) -> Route {
        Route {
            id,
            name: self.route_name,
            status: self.route_status,
            start_address: self.start_address.unwrap_or_default(),
            start_lat: self.start_lat,
            start_lng: self.start_lng,
            total_distance_meters: self.total_distance_meters,
            total_duration_seconds: self.total_duration_seconds,
            encoded_path: self.overview_polyline.filter(|path| !path.is_empty()),
            stops: self.stops,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedStop {
    id: StopId,
}

/// Validate a route detail body against the embedded schema and convert it.
pub fn parse_route_detail(route_id: RouteId, body: Value) -> Result<Route> {
    let compiled = ROUTE_DETAIL_VALIDATOR
        .as_ref()
        .map_err(|err| anyhow!("{err}"))?;
    if !compiled.is_valid(&body) {
        let messages = compiled
            .iter_errors(&body)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "route {} payload failed schema validation: {}",
            route_id,
            messages.join("; ")
        ));
    }
    let detail: RouteDetail = serde_json::from_value(body)
        .with_context(|| format!("deserialize route {route_id}"))?;
    Ok(detail.into_route(route_id))
}

/// Gateway backed by the routes HTTP API.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    credential: Credential,
}

impl HttpGateway {
    pub fn new(config: &CourierConfig, credential: Credential) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    fn route_url(&self, route_id: RouteId, suffix: &str) -> String {
        format!("{}/routes/{}{}", self.base_url, route_id, suffix)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request
            .bearer_auth(self.credential.token())
            .send()
            .await
            .with_context(|| format!("{action} request failed"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(anyhow!("{action} returned {status}: {}", body.trim()))
    }
}

#[async_trait]
impl SyncGateway for HttpGateway {
    #[instrument(skip_all, fields(route_id = route_id))]
    async fn fetch_route(&self, route_id: RouteId) -> Result<Route> {
        let action = format!("GET /routes/{route_id}");
        let response = self
            .send(self.client.get(self.route_url(route_id, "")), &action)
            .await?;
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("decode {action} body"))?;
        let route = parse_route_detail(route_id, body)?;
        debug!(stops = route.stops.len(), status = %route.status, "route fetched");
        Ok(route)
    }

    #[instrument(skip_all, fields(route_id = route_id))]
    async fn add_stop(&self, route_id: RouteId, address_text: &str) -> Result<StopId> {
        let action = format!("POST /routes/{route_id}/stops");
        let response = self
            .send(
                self.client
                    .post(self.route_url(route_id, "/stops"))
                    .json(&json!({ "addressText": address_text })),
                &action,
            )
            .await?;
        let created: CreatedStop = response
            .json()
            .await
            .with_context(|| format!("decode {action} body"))?;
        info!(stop_id = created.id, "stop created");
        Ok(created.id)
    }

    #[instrument(skip_all, fields(route_id = route_id, stop_id = stop_id))]
    async fn delete_stop(&self, route_id: RouteId, stop_id: StopId) -> Result<()> {
        let action = format!("DELETE /routes/{route_id}/stops/{stop_id}");
        self.send(
            self.client
                .delete(self.route_url(route_id, &format!("/stops/{stop_id}"))),
            &action,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(route_id = route_id, stop_id = stop_id, status = %status))]
    async fn set_stop_status(
        &self,
        route_id: RouteId,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<()> {
        let action = format!("PATCH /routes/{route_id}/stops/{stop_id}");
        self.send(
            self.client
                .patch(self.route_url(route_id, &format!("/stops/{stop_id}")))
                .json(&json!({ "status": status })),
            &action,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(route_id = route_id, status = %status))]
    async fn set_route_status(&self, route_id: RouteId, status: RouteStatus) -> Result<()> {
        let action = format!("PATCH /routes/{route_id}/status");
        self.send(
            self.client
                .patch(self.route_url(route_id, "/status"))
                .json(&json!({ "status": status })),
            &action,
        )
        .await?;
        Ok(())
    }
}
