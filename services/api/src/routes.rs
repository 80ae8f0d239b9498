use crate::infra::{deserialize_optional_date, AppState, Engine};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use qm_core::catalog::{parse_catalog, publish_new_version, CatalogDocument};
use qm_core::error::AppError;
use qm_core::reporting::{
    action_required_ratio, daily_trend, grouped_stats, histogram, ActionRequiredRatio, Dimension,
    GroupBy, GroupStats, HistogramBucket, ProfileContext, RadarEntry, RadarGrouping,
    SubmissionFilter, TrendPoint,
};
use qm_core::scoring::{AnswerSet, Scorecard};
use qm_core::store::StoreError;
use qm_core::submission::{format_wire_timestamp, parse_wire_timestamp, Submission};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    pub(crate) employee: String,
    pub(crate) evaluator: String,
    pub(crate) team: String,
    pub(crate) catalog: String,
    /// Locale wire timestamp, `24.09.2025, 14:30:00`. Missing means "now";
    /// an unparsable value is kept as a dateless submission.
    #[serde(default)]
    pub(crate) timestamp: Option<String>,
    pub(crate) answers: AnswerSet,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationView {
    pub(crate) id: String,
    pub(crate) employee: String,
    pub(crate) evaluator: String,
    pub(crate) team: String,
    pub(crate) catalog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timestamp: Option<String>,
    pub(crate) computed: Scorecard,
    pub(crate) answers: AnswerSet,
}

impl EvaluationView {
    fn from_stored(id: String, submission: Submission) -> Self {
        Self {
            id,
            employee: submission.employee,
            evaluator: submission.evaluator,
            team: submission.team,
            catalog: submission.catalog,
            timestamp: submission.submitted_at.as_ref().map(format_wire_timestamp),
            computed: submission.computed,
            answers: submission.answers,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportRequest {
    #[serde(default)]
    pub(crate) filter: SubmissionFilter,
    #[serde(default)]
    pub(crate) group_by: Option<GroupBy>,
    /// Per-question drilldown; only honored when the filter narrows by
    /// team or catalog, the axis count is unbounded otherwise.
    #[serde(default)]
    pub(crate) include_questions: bool,
    /// Reference date for recency figures (defaults to today).
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) total: usize,
    pub(crate) groups: Vec<GroupStats>,
    pub(crate) histogram: Vec<HistogramBucket>,
    pub(crate) radar_categories: Vec<RadarEntry>,
    pub(crate) radar_dimensions: Vec<RadarEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) questions: Option<Vec<RadarEntry>>,
    pub(crate) action_required: ActionRequiredRatio,
    pub(crate) trend: Vec<TrendPoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublishVersionRequest {
    pub(crate) root_id: String,
    #[serde(default)]
    pub(crate) rename_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MappingRequest {
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) dimension_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DimensionMapView {
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) assignments: Vec<AssignmentView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentView {
    pub(crate) category: String,
    pub(crate) dimension_id: String,
}

pub(crate) fn with_evaluation_routes(engine: Arc<Engine>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/evaluations",
            get(list_evaluations).post(create_evaluation),
        )
        .route("/api/v1/evaluations/search", post(search_evaluations))
        .route(
            "/api/v1/evaluations/:id",
            put(update_evaluation).delete(delete_evaluation),
        )
        .route("/api/v1/reports", post(report_endpoint))
        .route(
            "/api/v1/catalogs",
            get(list_catalogs).post(create_catalog).put(update_catalog),
        )
        .route("/api/v1/catalogs/:name", axum::routing::delete(delete_catalog))
        .route("/api/v1/catalogs/versions", post(publish_version_endpoint))
        .route(
            "/api/v1/dimensions",
            get(list_dimensions).post(upsert_dimension_endpoint),
        )
        .route("/api/v1/dimensions/mappings", post(upsert_mapping_endpoint))
        .layer(Extension(engine))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn build_submission(engine: &Engine, request: EvaluationRequest) -> Result<Submission, AppError> {
    let submitted_at = match request.timestamp.as_deref() {
        Some(raw) => parse_wire_timestamp(raw),
        None => Some(Local::now().naive_local()),
    };
    let computed = engine.score(&request.catalog, &request.answers)?;

    Ok(Submission {
        employee: request.employee,
        evaluator: request.evaluator,
        team: request.team,
        catalog: request.catalog,
        submitted_at,
        answers: request.answers,
        computed,
    })
}

pub(crate) async fn list_evaluations(
    Extension(engine): Extension<Arc<Engine>>,
) -> Json<Vec<EvaluationView>> {
    let rows = engine
        .submissions
        .list()
        .into_iter()
        .map(|(id, submission)| EvaluationView::from_stored(id, submission))
        .collect();
    Json(rows)
}

pub(crate) async fn search_evaluations(
    Extension(engine): Extension<Arc<Engine>>,
    Json(filter): Json<SubmissionFilter>,
) -> Json<Vec<EvaluationView>> {
    let rows = engine
        .submissions
        .list()
        .into_iter()
        .filter(|(_, submission)| filter.matches(submission))
        .map(|(id, submission)| EvaluationView::from_stored(id, submission))
        .collect();
    Json(rows)
}

pub(crate) async fn create_evaluation(
    Extension(engine): Extension<Arc<Engine>>,
    Json(request): Json<EvaluationRequest>,
) -> Result<(StatusCode, Json<EvaluationView>), AppError> {
    let submission = build_submission(&engine, request)?;
    let id = engine.submissions.insert(submission.clone());
    Ok((
        StatusCode::CREATED,
        Json(EvaluationView::from_stored(id, submission)),
    ))
}

pub(crate) async fn update_evaluation(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationView>, AppError> {
    let submission = build_submission(&engine, request)?;
    engine.submissions.update(&id, submission.clone())?;
    Ok(Json(EvaluationView::from_stored(id, submission)))
}

pub(crate) async fn delete_evaluation(
    Extension(engine): Extension<Arc<Engine>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    engine.submissions.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn report_endpoint(
    Extension(engine): Extension<Arc<Engine>>,
    Json(request): Json<ReportRequest>,
) -> Json<ReportResponse> {
    let ReportRequest {
        filter,
        group_by,
        include_questions,
        today,
    } = request;

    let index = engine.schema_index();
    let dimensions = engine.dimensions.snapshot();
    let submissions: Vec<Submission> = engine
        .submissions
        .list()
        .into_iter()
        .map(|(_, submission)| submission)
        .collect();
    let selected = filter.apply(&submissions);

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let group_by = group_by.unwrap_or(GroupBy::Team);
    let context = ProfileContext {
        index: index.as_ref(),
        names: &engine.names,
        dimensions: &dimensions,
    };

    let groups: Vec<GroupStats> = grouped_stats(selected.iter().copied(), group_by, today);
    let questions = if include_questions && filter.narrows_by_team_or_catalog() {
        Some(context.question_profile(selected.iter().copied()))
    } else {
        None
    };

    Json(ReportResponse {
        total: selected.len(),
        groups,
        histogram: histogram(selected.iter().copied()),
        radar_categories: context.radar_profile(selected.iter().copied(), RadarGrouping::Category),
        radar_dimensions: context.radar_profile(selected.iter().copied(), RadarGrouping::Dimension),
        questions,
        action_required: action_required_ratio(selected.iter().copied()),
        trend: daily_trend(selected.iter().copied()),
    })
}

pub(crate) async fn list_catalogs(
    Extension(engine): Extension<Arc<Engine>>,
) -> Json<Vec<CatalogDocument>> {
    Json(engine.catalogs.list())
}

pub(crate) async fn create_catalog(
    Extension(engine): Extension<Arc<Engine>>,
    Json(document): Json<CatalogDocument>,
) -> Result<(StatusCode, Json<CatalogDocument>), AppError> {
    // Reject documents the index would only skip later.
    parse_catalog(&document)?;
    engine.catalogs.insert(document.clone())?;
    engine.invalidate_schema();
    Ok((StatusCode::CREATED, Json(document)))
}

pub(crate) async fn update_catalog(
    Extension(engine): Extension<Arc<Engine>>,
    Json(document): Json<CatalogDocument>,
) -> Result<Json<CatalogDocument>, AppError> {
    parse_catalog(&document)?;
    let mut outcome = Err(StoreError::NotFound {
        id: format!("{} v{}", document.name, document.version),
    });
    engine.catalogs.modify(&mut |documents| {
        if let Some(slot) = documents
            .iter_mut()
            .find(|d| d.name == document.name && d.version == document.version)
        {
            *slot = document.clone();
            outcome = Ok(());
        }
    });
    outcome?;
    engine.invalidate_schema();
    Ok(Json(document))
}

pub(crate) async fn delete_catalog(
    Extension(engine): Extension<Arc<Engine>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut removed = false;
    engine.catalogs.modify(&mut |documents| {
        let before = documents.len();
        documents.retain(|d| d.name != name);
        removed = documents.len() != before;
    });
    if !removed {
        return Err(AppError::Store(StoreError::NotFound { id: name }));
    }
    engine.invalidate_schema();
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn publish_version_endpoint(
    Extension(engine): Extension<Arc<Engine>>,
    Json(request): Json<PublishVersionRequest>,
) -> Result<(StatusCode, Json<CatalogDocument>), AppError> {
    let mut outcome: Result<CatalogDocument, AppError> =
        Err(AppError::Store(StoreError::NotFound {
            id: request.root_id.clone(),
        }));
    engine.catalogs.modify(&mut |documents| {
        outcome = publish_new_version(documents, &request.root_id, request.rename_to.as_deref())
            .map(|published| documents[published].clone())
            .map_err(AppError::from);
    });
    let view = outcome?;
    engine.invalidate_schema();
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn list_dimensions(
    Extension(engine): Extension<Arc<Engine>>,
) -> Json<DimensionMapView> {
    let map = engine.dimensions.snapshot();
    let mut dimensions: Vec<Dimension> = map.dimensions().cloned().collect();
    dimensions.sort_by(|a, b| a.id.cmp(&b.id));
    let mut assignments: Vec<AssignmentView> = map
        .assignments()
        .map(|(category, dimension_id)| AssignmentView {
            category: category.to_string(),
            dimension_id: dimension_id.to_string(),
        })
        .collect();
    assignments.sort_by(|a, b| a.category.cmp(&b.category));
    Json(DimensionMapView {
        dimensions,
        assignments,
    })
}

pub(crate) async fn upsert_dimension_endpoint(
    Extension(engine): Extension<Arc<Engine>>,
    Json(dimension): Json<Dimension>,
) -> StatusCode {
    engine.dimensions.upsert_dimension(dimension);
    StatusCode::NO_CONTENT
}

pub(crate) async fn upsert_mapping_endpoint(
    Extension(engine): Extension<Arc<Engine>>,
    Json(request): Json<MappingRequest>,
) -> StatusCode {
    engine
        .dimensions
        .upsert_assignment(request.category, request.dimension_id);
    StatusCode::NO_CONTENT
}
