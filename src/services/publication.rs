use time::PrimitiveDateTime;

use crate::db::models::ProgressRecord;

/// Draft → Published transition. There is no unpublish; calling this on an
/// already-published record refreshes `published_at` only. Content edits and
/// parent feedback are not gated on publication state.
pub(crate) fn publish(record: &mut ProgressRecord, now: PrimitiveDateTime) {
    record.is_published = true;
    record.published_at = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::{LetterGrade, Term};
    use time::Duration;

    fn draft_record() -> ProgressRecord {
        let now = primitive_now_utc();
        ProgressRecord {
            id: "rec-1".to_string(),
            student: "student-a".to_string(),
            teacher: "teacher-1".to_string(),
            subject: "Math".to_string(),
            term: Term::Term1,
            year: 2026,
            class: "Form 2".to_string(),
            assessments: Vec::new(),
            average_score: 0.0,
            overall_grade: LetterGrade::F,
            attendance: Default::default(),
            behavior: Default::default(),
            teacher_comments: None,
            parent_feedback: None,
            is_published: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn publish_sets_flag_and_timestamp() {
        let mut record = draft_record();
        let now = primitive_now_utc();
        publish(&mut record, now);
        assert!(record.is_published);
        assert_eq!(record.published_at, Some(now));
    }

    #[test]
    fn republish_refreshes_timestamp() {
        let mut record = draft_record();
        let first = primitive_now_utc();
        publish(&mut record, first);

        let later = first + Duration::seconds(42);
        publish(&mut record, later);
        assert!(record.is_published);
        assert_eq!(record.published_at, Some(later));
    }
}
