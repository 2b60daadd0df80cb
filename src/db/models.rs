use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::db::types::{AssessmentKind, LetterGrade, Term, UserRole};

/// Caller identity resolved from the external identity subsystem. Only the
/// fields the progress domain needs are mirrored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) class: Option<String>,
    pub(crate) children_ids: Vec<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Assessment {
    pub(crate) name: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
    pub(crate) date: PrimitiveDateTime,
    pub(crate) kind: AssessmentKind,
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Attendance {
    pub(crate) present: i32,
    pub(crate) absent: i32,
    pub(crate) late: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Behavior {
    pub(crate) rating: i32,
    pub(crate) comments: Option<String>,
    pub(crate) improvements: Vec<String>,
    pub(crate) strengths: Vec<String>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self { rating: 3, comments: None, improvements: Vec::new(), strengths: Vec::new() }
    }
}

/// One student's performance in one subject for one term and year. The unit of
/// publication and parent feedback; never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProgressRecord {
    pub(crate) id: String,
    pub(crate) student: String,
    pub(crate) teacher: String,
    pub(crate) subject: String,
    pub(crate) term: Term,
    pub(crate) year: i32,
    pub(crate) class: String,
    pub(crate) assessments: Vec<Assessment>,
    pub(crate) average_score: f64,
    pub(crate) overall_grade: LetterGrade,
    pub(crate) attendance: Attendance,
    pub(crate) behavior: Behavior,
    pub(crate) teacher_comments: Option<String>,
    pub(crate) parent_feedback: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) published_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
