use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::analysis::{AnalysisResponse, SubjectAverageEntry};
use crate::services::analytics;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:student_id", post(generate_analysis))
}

async fn generate_analysis(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let student = repositories::users::find_by_id(state.store(), &student_id).await;
    if !student.is_some_and(|user| user.role == UserRole::Student) {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    let records = repositories::progress::list_for_student(state.store(), &student_id).await;
    let insight = analytics::analyze(&records);

    tracing::debug!(student = %student_id, records = records.len(), "Generated analysis");

    Ok(Json(AnalysisResponse {
        summary: insight.summary,
        overall_average: insight.overall_average,
        per_subject: insight.per_subject.map(|entries| {
            entries
                .into_iter()
                .map(|entry| SubjectAverageEntry { subject: entry.subject, avg: entry.average })
                .collect()
        }),
        weak_areas: insight.weak_areas,
        suggestions: insight.suggestions,
    }))
}
