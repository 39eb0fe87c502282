use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analysis::{self, Comparison, SensitivityReport};
use crate::config::Config;
use crate::error::McdmError;
use crate::ranking::{self, RankMethod, RankingParams, RankingResult};
use crate::types::{catalog, MethodCatalog, Problem};
use crate::weighting::{WeightMethod, WeightResult};

#[derive(Clone)]
struct ApiState {
    config: Config,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<McdmError> for ApiError {
    fn from(error: McdmError) -> Self {
        let status = match &error {
            McdmError::SingularMatrix { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            McdmError::TaskFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        if !error.is_validation() {
            warn!("request failed: {error}");
        }
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeightsRequest {
    method: String,
    #[serde(flatten)]
    problem: Problem,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankRequest {
    method: String,
    weighting_method: Option<String>,
    #[serde(flatten)]
    problem: Problem,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankResponse {
    #[serde(flatten)]
    result: RankingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<WeightResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareRequest {
    methods: Vec<String>,
    weighting_method: Option<String>,
    #[serde(flatten)]
    problem: Problem,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    #[serde(flatten)]
    comparison: Comparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<WeightResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SensitivityRequest {
    method: String,
    weighting_method: Option<String>,
    variations: Option<Vec<f64>>,
    #[serde(flatten)]
    problem: Problem,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/methods", get(methods))
        .route("/v1/config", get(show_config))
        .route("/v1/weights", post(weights))
        .route("/v1/rank", post(rank))
        .route("/v1/compare", post(compare))
        .route("/v1/sensitivity", post(sensitivity))
        .layer(cors)
        .with_state(ApiState { config });

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn methods() -> Json<ApiResponse<MethodCatalog>> {
    ok(catalog())
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn weights(Json(request): Json<WeightsRequest>) -> ApiResult<WeightResult> {
    let method: WeightMethod = request.method.parse()?;
    Ok(ok(request.problem.weights(method)?))
}

async fn rank(
    State(state): State<ApiState>,
    Json(request): Json<RankRequest>,
) -> ApiResult<RankResponse> {
    let method: RankMethod = request.method.parse()?;
    let weighting = parse_weighting(request.weighting_method.as_deref())?;
    let params = effective_params(&state, &request.problem);
    let (matrix, weights) = request.problem.prepare(weighting)?;
    let result = ranking::rank(method, &matrix, &params)?;
    Ok(ok(RankResponse { result, weights }))
}

async fn compare(
    State(state): State<ApiState>,
    Json(request): Json<CompareRequest>,
) -> ApiResult<CompareResponse> {
    if request.methods.is_empty() {
        return Err(ApiError::bad_request("methods list cannot be empty"));
    }
    let methods = request
        .methods
        .iter()
        .map(|name| name.parse::<RankMethod>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let weighting = parse_weighting(request.weighting_method.as_deref())?;
    let params = effective_params(&state, &request.problem);
    let (matrix, weights) = request.problem.prepare(weighting)?;
    let comparison = analysis::compare(&matrix, &methods, &params).await?;
    Ok(ok(CompareResponse {
        comparison,
        weights,
    }))
}

async fn sensitivity(
    State(state): State<ApiState>,
    Json(request): Json<SensitivityRequest>,
) -> ApiResult<SensitivityReport> {
    let method: RankMethod = request.method.parse()?;
    let weighting = parse_weighting(request.weighting_method.as_deref())?;
    let params = effective_params(&state, &request.problem);
    let variations = request
        .variations
        .unwrap_or_else(|| state.config.sensitivity.variations.clone());
    let (matrix, _) = request.problem.prepare(weighting)?;
    let report = analysis::sensitivity(method, &matrix, &params, &variations)?;
    Ok(ok(report))
}

fn parse_weighting(name: Option<&str>) -> std::result::Result<Option<WeightMethod>, ApiError> {
    Ok(name.map(str::parse::<WeightMethod>).transpose()?)
}

fn effective_params(state: &ApiState, problem: &Problem) -> RankingParams {
    state.config.ranking.params().with_overrides(&problem.ranking)
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ApiState {
        ApiState {
            config: Config::default(),
        }
    }

    fn request_body(method: &str) -> serde_json::Value {
        serde_json::json!({
            "method": method,
            "alternatives": [
                {"id": "a1", "name": "North", "scores": {"cost": 250, "quality": 16}},
                {"id": "a2", "name": "South", "scores": {"cost": 200, "quality": 16}},
                {"id": "a3", "name": "East", "scores": {"cost": 300, "quality": 32}}
            ],
            "criteria": [
                {"id": "cost", "name": "Cost", "type": "non-beneficial", "weight": 0.5},
                {"id": "quality", "name": "Quality", "type": "beneficial", "weight": 0.5}
            ],
            "vikorVValue": 0.3
        })
    }

    #[test]
    fn rank_uses_request_parameters() {
        let request: RankRequest = serde_json::from_value(request_body("vikor")).expect("request");
        let params = effective_params(&state(), &request.problem);
        assert_eq!(params.vikor_v, 0.3);
        assert_eq!(params.codas_tau, 0.02);

        let Json(response) =
            tokio_test::block_on(rank(State(state()), Json(request))).expect("rank");
        assert!(response.ok);
        assert_eq!(response.data.result.ranking.len(), 3);
        assert!(response.data.weights.is_none());
    }

    #[test]
    fn unknown_method_is_bad_request() {
        let request: RankRequest = serde_json::from_value(request_body("oracle")).expect("request");
        let err = tokio_test::block_on(rank(State(state()), Json(request))).expect_err("unknown");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("unsupported ranking method"));
    }

    #[test]
    fn weighting_method_reweights_before_ranking() {
        let mut body = request_body("topsis");
        body["weightingMethod"] = serde_json::json!("entropy");
        let request: RankRequest = serde_json::from_value(body).expect("request");
        let Json(response) =
            tokio_test::block_on(rank(State(state()), Json(request))).expect("rank");
        let weights = response.data.weights.expect("entropy weights");
        let total: f64 = weights.weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singular_matrix_is_unprocessable() {
        let err = ApiError::from(McdmError::SingularMatrix {
            method: "DEMATEL".to_string(),
        });
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let err = ApiError::from(McdmError::EmptyCriteria);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn compare_rejects_empty_method_list() {
        let mut body = request_body("topsis");
        body["methods"] = serde_json::json!([]);
        let request: CompareRequest = serde_json::from_value(body).expect("request");
        let err = tokio_test::block_on(compare(State(state()), Json(request))).expect_err("empty");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn sensitivity_defaults_to_configured_variations() {
        let request: SensitivityRequest =
            serde_json::from_value(request_body("wsm")).expect("request");
        let Json(response) =
            tokio_test::block_on(sensitivity(State(state()), Json(request))).expect("sensitivity");
        assert_eq!(response.data.variations, Config::default().sensitivity.variations);
        assert_eq!(response.data.criteria.len(), 2);
    }
}
