use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentParent, CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::{current_year, format_primitive, primitive_now_utc, to_primitive_utc};
use crate::db::models::{Assessment, Attendance, Behavior, ProgressRecord};
use crate::db::types::{AssessmentKind, Term, UserRole};
use crate::repositories;
use crate::repositories::progress::ProgressFilter;
use crate::schemas::progress::{
    AssessmentCreate, AssessmentResponse, AttendanceInput, BehaviorInput, FeedbackCreate,
    ProgressCreate, ProgressListResponse, ProgressResponse, ProgressUpdate, SimpleProgressCreate,
    StatsOverviewResponse, StudentHistoryResponse,
};
use crate::services::access::{self, ListScope};
use crate::services::{analytics, charts, grading, publication};

#[derive(Debug, Deserialize)]
pub(crate) struct ListProgressQuery {
    #[serde(default)]
    student: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    term: Option<Term>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    class: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_progress).post(create_progress))
        .route("/simple", post(create_simple_progress))
        .route("/student/:student_id", get(student_history))
        .route("/stats/overview", get(stats_overview))
        .route("/:id", get(get_progress).put(update_progress))
        .route("/:id/publish", put(publish_progress))
        .route("/:id/feedback", post(add_parent_feedback))
}

async fn list_progress(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ListProgressQuery>,
) -> Result<Json<ProgressListResponse>, ApiError> {
    let (students, teacher) = match access::list_scope(&user, params.student.as_deref()) {
        ListScope::Empty => {
            return Ok(Json(ProgressListResponse { progress: Vec::new() }));
        }
        ListScope::Scoped { students, teacher } => (students, teacher),
    };

    let filter = ProgressFilter {
        students,
        teacher,
        subject: params.subject,
        term: params.term,
        year: params.year,
        class: params.class,
    };

    let records = repositories::progress::list(state.store(), &filter).await;

    Ok(Json(ProgressListResponse {
        progress: records.into_iter().map(progress_to_response).collect(),
    }))
}

async fn create_progress(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<ProgressCreate>,
) -> Result<(StatusCode, Json<ProgressResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let student = repositories::users::find_by_id(state.store(), &payload.student).await;
    if !student.is_some_and(|user| user.role == UserRole::Student) {
        return Err(ApiError::BadRequest("Student not found".to_string()));
    }

    let assessments: Vec<Assessment> =
        payload.assessments.into_iter().map(assessment_from_input).collect();
    let (average_score, overall_grade) = grading::compute(&assessments);

    let now = primitive_now_utc();
    let record = ProgressRecord {
        id: Uuid::new_v4().to_string(),
        student: payload.student,
        teacher: teacher.id,
        subject: payload.subject,
        term: payload.term,
        year: payload.year.unwrap_or_else(current_year),
        class: payload.class,
        assessments,
        average_score,
        overall_grade,
        attendance: payload.attendance.map(attendance_from_input).unwrap_or_default(),
        behavior: payload.behavior.map(behavior_from_input).unwrap_or_default(),
        teacher_comments: payload.teacher_comments,
        parent_feedback: None,
        is_published: false,
        published_at: None,
        created_at: now,
        updated_at: now,
    };

    let record = repositories::progress::create(state.store(), record).await;

    tracing::info!(record_id = %record.id, student = %record.student, "Progress record created");

    Ok((StatusCode::CREATED, Json(progress_to_response(record))))
}

async fn create_simple_progress(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<SimpleProgressCreate>,
) -> Result<(StatusCode, Json<ProgressResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let student = repositories::users::find_by_id(state.store(), &payload.student_id).await;
    let Some(student) = student.filter(|user| user.role == UserRole::Student) else {
        return Err(ApiError::BadRequest("Student not found".to_string()));
    };

    let now = primitive_now_utc();
    let assessment = Assessment {
        name: "Assessment".to_string(),
        score: payload.score,
        max_score: 100.0,
        date: payload.date.map(to_primitive_utc).unwrap_or(now),
        kind: AssessmentKind::Test,
        comments: payload.notes.clone(),
    };

    // Same derivation as the full form, over the one-element list.
    let assessments = vec![assessment];
    let (average_score, overall_grade) = grading::compute(&assessments);

    let record = ProgressRecord {
        id: Uuid::new_v4().to_string(),
        student: payload.student_id,
        teacher: teacher.id,
        subject: payload.subject,
        term: Term::Term1,
        year: current_year(),
        class: student.class.unwrap_or_else(|| "N/A".to_string()),
        assessments,
        average_score,
        overall_grade,
        attendance: Attendance::default(),
        behavior: Behavior::default(),
        teacher_comments: payload.notes,
        parent_feedback: None,
        is_published: false,
        published_at: None,
        created_at: now,
        updated_at: now,
    };

    let record = repositories::progress::create(state.store(), record).await;

    Ok((StatusCode::CREATED, Json(progress_to_response(record))))
}

async fn student_history(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentHistoryResponse>, ApiError> {
    let records = repositories::progress::list_for_student(state.store(), &student_id).await;

    let summary = analytics::summarize(&records);
    let charts = charts::project(&summary);

    Ok(Json(StudentHistoryResponse {
        records: records.into_iter().map(progress_to_response).collect(),
        charts,
    }))
}

async fn stats_overview(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<StatsOverviewResponse>, ApiError> {
    let (students, teacher) = match access::list_scope(&user, None) {
        ListScope::Empty => (Some(Vec::new()), None),
        ListScope::Scoped { students, teacher } => (students, teacher),
    };

    let filter = ProgressFilter { students, teacher, ..Default::default() };
    let records = repositories::progress::list(state.store(), &filter).await;

    let total_records = records.len();
    let published_records = records.iter().filter(|record| record.is_published).count();
    let average_score = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|record| record.average_score).sum::<f64>() / total_records as f64
    };

    Ok(Json(StatsOverviewResponse { total_records, published_records, average_score }))
}

async fn get_progress(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let record = repositories::progress::find_by_id(state.store(), &id)
        .await
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    if !access::can_read(&user, &record) {
        return Err(ApiError::Forbidden("Access denied"));
    }

    Ok(Json(progress_to_response(record)))
}

async fn update_progress(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<Json<ProgressResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = repositories::progress::find_by_id(state.store(), &id)
        .await
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    if !access::can_write(&teacher, &record) {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let assessments: Option<Vec<Assessment>> = payload
        .assessments
        .map(|entries| entries.into_iter().map(assessment_from_input).collect());

    let updated = repositories::progress::update(state.store(), &id, move |record| {
        if let Some(assessments) = assessments {
            // Average and grade always change together with the assessments.
            let (average_score, overall_grade) = grading::compute(&assessments);
            record.assessments = assessments;
            record.average_score = average_score;
            record.overall_grade = overall_grade;
        }
        if let Some(attendance) = &payload.attendance {
            merge_attendance(&mut record.attendance, attendance);
        }
        if let Some(behavior) = payload.behavior {
            merge_behavior(&mut record.behavior, behavior);
        }
        if payload.teacher_comments.is_some() {
            record.teacher_comments = payload.teacher_comments;
        }
    })
    .await
    .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    Ok(Json(progress_to_response(updated)))
}

async fn publish_progress(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let record = repositories::progress::find_by_id(state.store(), &id)
        .await
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    if !access::can_publish(&teacher, &record) {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let now = primitive_now_utc();
    let updated = repositories::progress::update(state.store(), &id, |record| {
        publication::publish(record, now);
    })
    .await
    .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    tracing::info!(record_id = %updated.id, "Progress record published");

    Ok(Json(progress_to_response(updated)))
}

async fn add_parent_feedback(
    CurrentParent(parent): CurrentParent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<FeedbackCreate>,
) -> Result<Json<ProgressResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = repositories::progress::find_by_id(state.store(), &id)
        .await
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    if !access::can_give_feedback(&parent, &record) {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let updated = repositories::progress::update(state.store(), &id, |record| {
        record.parent_feedback = Some(payload.parent_feedback);
    })
    .await
    .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    Ok(Json(progress_to_response(updated)))
}

fn assessment_from_input(input: AssessmentCreate) -> Assessment {
    Assessment {
        name: input.name,
        score: input.score,
        max_score: input.max_score,
        date: to_primitive_utc(input.date),
        kind: input.kind,
        comments: input.comments,
    }
}

fn attendance_from_input(input: AttendanceInput) -> Attendance {
    Attendance {
        present: input.present.unwrap_or(0),
        absent: input.absent.unwrap_or(0),
        late: input.late.unwrap_or(0),
    }
}

fn behavior_from_input(input: BehaviorInput) -> Behavior {
    Behavior {
        rating: input.rating.unwrap_or(3),
        comments: input.comments,
        improvements: input.improvements.unwrap_or_default(),
        strengths: input.strengths.unwrap_or_default(),
    }
}

fn merge_attendance(current: &mut Attendance, input: &AttendanceInput) {
    if let Some(present) = input.present {
        current.present = present;
    }
    if let Some(absent) = input.absent {
        current.absent = absent;
    }
    if let Some(late) = input.late {
        current.late = late;
    }
}

fn merge_behavior(current: &mut Behavior, input: BehaviorInput) {
    if let Some(rating) = input.rating {
        current.rating = rating;
    }
    if input.comments.is_some() {
        current.comments = input.comments;
    }
    if let Some(improvements) = input.improvements {
        current.improvements = improvements;
    }
    if let Some(strengths) = input.strengths {
        current.strengths = strengths;
    }
}

pub(crate) fn progress_to_response(record: ProgressRecord) -> ProgressResponse {
    ProgressResponse {
        id: record.id,
        student: record.student,
        teacher: record.teacher,
        subject: record.subject,
        term: record.term,
        year: record.year,
        class: record.class,
        assessments: record
            .assessments
            .into_iter()
            .map(|assessment| AssessmentResponse {
                name: assessment.name,
                score: assessment.score,
                max_score: assessment.max_score,
                date: format_primitive(assessment.date),
                kind: assessment.kind,
                comments: assessment.comments,
            })
            .collect(),
        average_score: record.average_score,
        overall_grade: record.overall_grade,
        attendance: record.attendance,
        behavior: record.behavior,
        teacher_comments: record.teacher_comments,
        parent_feedback: record.parent_feedback,
        is_published: record.is_published,
        published_at: record.published_at.map(format_primitive),
        created_at: format_primitive(record.created_at),
        updated_at: format_primitive(record.updated_at),
    }
}
