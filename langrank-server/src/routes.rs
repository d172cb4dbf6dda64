//! HTTP handlers for the langrank server.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};
use langrank_core::{BadgeStyle, RankOptions, Ranking, rank_detailed, render_badge};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::github::ProfileSource;
use crate::openapi::ApiDoc;

/// Content type of the badge document.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Upstream profile source.
    pub source: Arc<dyn ProfileSource + Send + Sync>,
    /// Ranking options.
    pub options: RankOptions,
    /// Badge appearance.
    pub badge: BadgeStyle,
    /// `max-age` for the badge cache directive, in seconds.
    pub cache_seconds: u32,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

fn error_response(mut builder: actix_web::HttpResponseBuilder, message: String) -> HttpResponse {
    builder.json(ErrorResponse { message })
}

async fn load_ranking(state: &web::Data<AppState>) -> Result<Ranking, HttpResponse> {
    let source = state.source.clone();
    let profiles = match web::block(move || source.fetch_profiles()).await {
        Ok(Ok(profiles)) => profiles,
        Ok(Err(err)) => {
            warn!("profile fetch failed: {err}");
            return Err(error_response(HttpResponse::BadGateway(), err.to_string()));
        }
        Err(err) => {
            error!("profile fetch task failed: {err}");
            return Err(error_response(
                HttpResponse::InternalServerError(),
                "profile fetch task failed".to_string(),
            ));
        }
    };

    rank_detailed(&profiles, &state.options).map_err(|err| {
        error!("ranking failed: {err}");
        error_response(HttpResponse::InternalServerError(), err.to_string())
    })
}

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Language badge", body = String, content_type = "image/svg+xml"),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 500, description = "Ranking failure", body = ErrorResponse)
    ),
    tag = "stats"
)]
#[get("/stats")]
/// Render the language badge as SVG.
pub async fn stats(state: web::Data<AppState>) -> impl Responder {
    match load_ranking(&state).await {
        Ok(ranking) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, SVG_CONTENT_TYPE))
            .insert_header((
                header::CACHE_CONTROL,
                format!("public, max-age={}", state.cache_seconds),
            ))
            .body(render_badge(&ranking, &state.badge)),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/api/rankings",
    responses(
        (status = 200, description = "Ranked languages", body = Ranking),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 500, description = "Ranking failure", body = ErrorResponse)
    ),
    tag = "stats"
)]
#[get("/api/rankings")]
/// Return the ranking as JSON.
pub async fn rankings(state: web::Data<AppState>) -> impl Responder {
    match load_ranking(&state).await {
        Ok(ranking) => HttpResponse::Ok().json(ranking),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/api/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
