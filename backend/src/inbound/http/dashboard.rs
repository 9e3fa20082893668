//! Dashboard overview handlers.
//!
//! `GET /api/v1/dashboard/overview` waits for every region up to the
//! configured deadline. `GET /api/v1/dashboard/overview/stream` answers at
//! once with newline-delimited JSON: a placeholder frame per region, then one
//! settled frame per region as each query finishes.

use actix_web::web::Bytes;
use actix_web::{HttpResponse, get, web};
use futures_util::StreamExt;

use crate::domain::{Error, OverviewSnapshot, RegionFrame};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Media type of the overview stream.
pub const NDJSON: &str = "application/x-ndjson";

fn ndjson_line(frame: &RegionFrame) -> Result<Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(frame)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Overview with every region settled or marked pending.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/overview",
    responses(
        (status = 200, description = "Overview snapshot", body = OverviewSnapshot),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardOverview"
)]
#[get("/dashboard/overview")]
pub async fn overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OverviewSnapshot>> {
    session.require_user_id()?;
    Ok(web::Json(state.overview.snapshot().await))
}

/// Progressive overview as NDJSON region frames.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/overview/stream",
    responses(
        (status = 200, description = "One RegionFrame per line", body = RegionFrame,
            content_type = "application/x-ndjson"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardOverviewStream"
)]
#[get("/dashboard/overview/stream")]
pub async fn overview_stream(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let lines = state.overview.stream().map(|frame| ndjson_line(&frame));
    Ok(HttpResponse::Ok().content_type(NDJSON).streaming(lines))
}
