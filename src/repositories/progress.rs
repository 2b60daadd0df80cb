use crate::core::time::primitive_now_utc;
use crate::db::models::ProgressRecord;
use crate::db::types::Term;
use crate::db::DocumentStore;

#[derive(Debug, Default)]
pub(crate) struct ProgressFilter {
    /// Restrict to records whose student is in this set. `None` leaves the
    /// student axis unfiltered; `Some(vec![])` matches nothing.
    pub(crate) students: Option<Vec<String>>,
    pub(crate) teacher: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) term: Option<Term>,
    pub(crate) year: Option<i32>,
    pub(crate) class: Option<String>,
}

impl ProgressFilter {
    fn matches(&self, record: &ProgressRecord) -> bool {
        if let Some(students) = &self.students {
            if !students.iter().any(|id| *id == record.student) {
                return false;
            }
        }
        if let Some(teacher) = &self.teacher {
            if *teacher != record.teacher {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if *subject != record.subject {
                return false;
            }
        }
        if let Some(term) = self.term {
            if term != record.term {
                return false;
            }
        }
        if let Some(year) = self.year {
            if year != record.year {
                return false;
            }
        }
        if let Some(class) = &self.class {
            if *class != record.class {
                return false;
            }
        }
        true
    }
}

pub(crate) async fn create(store: &DocumentStore, record: ProgressRecord) -> ProgressRecord {
    let mut records = store.progress_mut().await;
    records.push(record.clone());
    record
}

pub(crate) async fn find_by_id(store: &DocumentStore, id: &str) -> Option<ProgressRecord> {
    store.progress().await.iter().find(|record| record.id == id).cloned()
}

/// Newest first, matching the listing contract.
pub(crate) async fn list(store: &DocumentStore, filter: &ProgressFilter) -> Vec<ProgressRecord> {
    store.progress().await.iter().rev().filter(|record| filter.matches(record)).cloned().collect()
}

/// A single student's records in creation order, the shape the analytics
/// pipeline consumes.
pub(crate) async fn list_for_student(
    store: &DocumentStore,
    student_id: &str,
) -> Vec<ProgressRecord> {
    store.progress().await.iter().filter(|record| record.student == student_id).cloned().collect()
}

/// Apply a mutation to one record under the store's write lock. The mutation
/// and the `updated_at` refresh land as a single document write.
pub(crate) async fn update<F>(store: &DocumentStore, id: &str, apply: F) -> Option<ProgressRecord>
where
    F: FnOnce(&mut ProgressRecord),
{
    let mut records = store.progress_mut().await;
    let record = records.iter_mut().find(|record| record.id == id)?;
    apply(record);
    record.updated_at = primitive_now_utc();
    Some(record.clone())
}
