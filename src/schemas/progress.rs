use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use validator::Validate;

use crate::db::models::{Attendance, Behavior};
use crate::db::types::{AssessmentKind, LetterGrade, Term};

pub(crate) const MAX_COMMENT_LEN: u64 = 1000;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[validate(range(min = 0.0, max = 100.0, message = "score must be between 0 and 100"))]
    pub(crate) score: f64,
    #[serde(default = "default_max_score")]
    #[serde(alias = "maxScore")]
    #[validate(range(exclusive_min = 0.0, message = "max_score must be positive"))]
    pub(crate) max_score: f64,
    #[serde(deserialize_with = "deserialize_offset_datetime_flexible")]
    pub(crate) date: OffsetDateTime,
    #[serde(alias = "type")]
    pub(crate) kind: AssessmentKind,
    #[serde(default)]
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AttendanceInput {
    #[serde(default)]
    #[validate(range(min = 0, message = "present must be non-negative"))]
    pub(crate) present: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "absent must be non-negative"))]
    pub(crate) absent: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "late must be non-negative"))]
    pub(crate) late: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct BehaviorInput {
    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub(crate) rating: Option<i32>,
    #[serde(default)]
    pub(crate) comments: Option<String>,
    #[serde(default)]
    pub(crate) improvements: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) strengths: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProgressCreate {
    #[validate(length(min = 1, message = "student id is required"))]
    pub(crate) student: String,
    #[validate(length(min = 1, message = "subject is required"))]
    pub(crate) subject: String,
    pub(crate) term: Term,
    #[serde(default)]
    pub(crate) year: Option<i32>,
    #[validate(length(min = 1, message = "class is required"))]
    pub(crate) class: String,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) assessments: Vec<AssessmentCreate>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) attendance: Option<AttendanceInput>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) behavior: Option<BehaviorInput>,
    #[serde(default)]
    #[serde(alias = "teacherComments")]
    #[validate(length(max = 1000, message = "teacher_comments must be at most 1000 characters"))]
    pub(crate) teacher_comments: Option<String>,
}

/// Reduced single-score shortcut; the handler synthesizes one assessment
/// entry from it.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SimpleProgressCreate {
    #[serde(alias = "studentId")]
    #[validate(length(min = 1, message = "student id is required"))]
    pub(crate) student_id: String,
    #[validate(length(min = 1, message = "subject is required"))]
    pub(crate) subject: String,
    #[validate(range(min = 0.0, max = 100.0, message = "score must be between 0 and 100"))]
    pub(crate) score: f64,
    #[serde(default, deserialize_with = "deserialize_option_offset_datetime_flexible")]
    pub(crate) date: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProgressUpdate {
    #[serde(default)]
    #[validate(nested)]
    pub(crate) assessments: Option<Vec<AssessmentCreate>>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) attendance: Option<AttendanceInput>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) behavior: Option<BehaviorInput>,
    #[serde(default)]
    #[serde(alias = "teacherComments")]
    #[validate(length(max = 1000, message = "teacher_comments must be at most 1000 characters"))]
    pub(crate) teacher_comments: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FeedbackCreate {
    #[serde(alias = "parentFeedback")]
    #[validate(length(
        min = 1,
        max = 1000,
        message = "parent_feedback must be between 1 and 1000 characters"
    ))]
    pub(crate) parent_feedback: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) name: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
    pub(crate) date: String,
    #[serde(rename = "type")]
    pub(crate) kind: AssessmentKind,
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) id: String,
    pub(crate) student: String,
    pub(crate) teacher: String,
    pub(crate) subject: String,
    pub(crate) term: Term,
    pub(crate) year: i32,
    pub(crate) class: String,
    pub(crate) assessments: Vec<AssessmentResponse>,
    pub(crate) average_score: f64,
    pub(crate) overall_grade: LetterGrade,
    pub(crate) attendance: Attendance,
    pub(crate) behavior: Behavior,
    pub(crate) teacher_comments: Option<String>,
    pub(crate) parent_feedback: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) published_at: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressListResponse {
    pub(crate) progress: Vec<ProgressResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChartPoint {
    pub(crate) date: String,
    pub(crate) score: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectSeriesResponse {
    pub(crate) subject: String,
    pub(crate) points: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectAverageResponse {
    pub(crate) subject: String,
    pub(crate) average: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChartPayload {
    pub(crate) subjects: Vec<SubjectSeriesResponse>,
    pub(crate) timeline: Vec<ChartPoint>,
    pub(crate) subject_averages: Vec<SubjectAverageResponse>,
    pub(crate) overall_average: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentHistoryResponse {
    pub(crate) records: Vec<ProgressResponse>,
    pub(crate) charts: ChartPayload,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatsOverviewResponse {
    pub(crate) total_records: usize,
    pub(crate) published_records: usize,
    pub(crate) average_score: f64,
}

fn default_max_score() -> f64 {
    100.0
}

fn parse_offset_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // Frontend date pickers often send without timezone.
    if raw.len() == 16 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}:00Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    if raw.len() == 19 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    // Bare date, midnight UTC.
    if let Ok(value) = time::Date::parse(raw, &format_description!("[year]-[month]-[day]")) {
        return Some(PrimitiveDateTime::new(value, time::Time::MIDNIGHT).assume_utc());
    }

    None
}

fn deserialize_offset_datetime_flexible<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_offset_datetime_flexible(&raw)
        .ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
}

fn deserialize_option_offset_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_offset_datetime_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flexible_datetime_accepts_common_shapes() {
        assert!(parse_offset_datetime_flexible("2026-03-04T10:20:30Z").is_some());
        assert!(parse_offset_datetime_flexible("2026-03-04T10:20").is_some());
        assert!(parse_offset_datetime_flexible("2026-03-04T10:20:30").is_some());
        assert!(parse_offset_datetime_flexible("2026-03-04").is_some());
        assert!(parse_offset_datetime_flexible("yesterday").is_none());
    }

    #[test]
    fn assessment_score_range_is_enforced() {
        let payload: AssessmentCreate = serde_json::from_value(serde_json::json!({
            "name": "Quiz 1",
            "score": 101.0,
            "date": "2026-03-04T10:00:00Z",
            "type": "quiz"
        }))
        .expect("deserialize");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn feedback_length_is_capped() {
        let long = "x".repeat(MAX_COMMENT_LEN as usize + 1);
        let payload = FeedbackCreate { parent_feedback: long };
        assert!(payload.validate().is_err());

        let payload = FeedbackCreate { parent_feedback: "Well done".to_string() };
        assert!(payload.validate().is_ok());
    }
}
