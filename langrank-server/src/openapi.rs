//! OpenAPI specification for the langrank server.

use utoipa::OpenApi;

use langrank_core::{RankedEntry, Ranking, ScoreTransform};

use crate::routes::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::stats,
        crate::routes::rankings,
        crate::routes::openapi_json
    ),
    components(schemas(Ranking, RankedEntry, ScoreTransform, ErrorResponse)),
    tags(
        (name = "stats", description = "Language statistics"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the langrank server.
pub struct ApiDoc;
