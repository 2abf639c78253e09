//! JSON-over-HTTP surface for the activity feed.

use crate::activity::{
    ActivityError, ActivityService, BlockTimeResolver, MarketActivity, TransactionSource,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

pub const MARKET_ACTIVITY_PATH: &str = "/market-activity";

pub enum ApiError {
    MissingMarketId,
    BadQuery(String),
    Internal(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection.body_text())
    }
}

impl From<ActivityError> for ApiError {
    fn from(err: ActivityError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingMarketId => {
                (StatusCode::BAD_REQUEST, "marketId is required".to_string())
            }
            ApiError::BadQuery(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketActivityParams {
    #[serde(rename = "marketId")]
    pub market_id: Option<String>,
}

pub fn router<S, R>(service: Arc<ActivityService<S, R>>) -> Router
where
    S: TransactionSource + Send + Sync + 'static,
    R: BlockTimeResolver + Send + Sync + 'static,
{
    Router::new()
        .route(MARKET_ACTIVITY_PATH, get(market_activity::<S, R>))
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .with_state(service)
}

async fn market_activity<S, R>(
    State(service): State<Arc<ActivityService<S, R>>>,
    query: Result<Query<MarketActivityParams>, QueryRejection>,
) -> Result<Json<Vec<MarketActivity>>, ApiError>
where
    S: TransactionSource + Send + Sync + 'static,
    R: BlockTimeResolver + Send + Sync + 'static,
{
    let Query(params) = query?;
    let market_id = params
        .market_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingMarketId)?;
    let activity = service.market_activity(&market_id).await.map_err(|e| {
        warn!(%market_id, error = %e, "market activity failed");
        ApiError::from(e)
    })?;
    Ok(Json(activity))
}
