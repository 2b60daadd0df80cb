use crate::db::models::{ProgressRecord, User};
use crate::db::types::UserRole;

/// The set of records a caller may see, derived from role and relationships.
/// Listing and stats endpoints apply this as an implicit filter; explicit
/// query filters may narrow the scope but never broaden past it.
#[derive(Debug, Clone)]
pub(crate) enum RecordScope {
    OwnRecords(String),
    Children(Vec<String>),
    Authored(String),
    Unrestricted,
}

pub(crate) fn scope_for(user: &User) -> RecordScope {
    match user.role {
        UserRole::Student => RecordScope::OwnRecords(user.id.clone()),
        UserRole::Parent => RecordScope::Children(user.children_ids.clone()),
        UserRole::Teacher => RecordScope::Authored(user.id.clone()),
        UserRole::Admin => RecordScope::Unrestricted,
    }
}

impl RecordScope {
    pub(crate) fn permits(&self, record: &ProgressRecord) -> bool {
        match self {
            RecordScope::OwnRecords(student) => *student == record.student,
            RecordScope::Children(children) => children.iter().any(|id| *id == record.student),
            RecordScope::Authored(teacher) => *teacher == record.teacher,
            RecordScope::Unrestricted => true,
        }
    }
}

pub(crate) fn can_read(user: &User, record: &ProgressRecord) -> bool {
    scope_for(user).permits(record)
}

/// Content mutation is reserved for the record's owning teacher; admins are
/// deliberately excluded.
pub(crate) fn can_write(user: &User, record: &ProgressRecord) -> bool {
    user.role == UserRole::Teacher && user.id == record.teacher
}

pub(crate) fn can_publish(user: &User, record: &ProgressRecord) -> bool {
    can_write(user, record)
}

pub(crate) fn can_give_feedback(user: &User, record: &ProgressRecord) -> bool {
    user.role == UserRole::Parent && user.children_ids.iter().any(|id| *id == record.student)
}

/// Student-axis filter for listing, after combining the caller's scope with an
/// optional explicit `student` query filter.
#[derive(Debug, PartialEq)]
pub(crate) enum ListScope {
    /// The requested filter falls outside the caller's scope; the result is
    /// empty without touching the store.
    Empty,
    Scoped { students: Option<Vec<String>>, teacher: Option<String> },
}

pub(crate) fn list_scope(user: &User, requested_student: Option<&str>) -> ListScope {
    match (scope_for(user), requested_student) {
        (RecordScope::OwnRecords(own), None) => {
            ListScope::Scoped { students: Some(vec![own]), teacher: None }
        }
        (RecordScope::OwnRecords(own), Some(requested)) => {
            if own == requested {
                ListScope::Scoped { students: Some(vec![own]), teacher: None }
            } else {
                ListScope::Empty
            }
        }
        (RecordScope::Children(children), None) => {
            ListScope::Scoped { students: Some(children), teacher: None }
        }
        (RecordScope::Children(children), Some(requested)) => {
            if children.iter().any(|id| id == requested) {
                ListScope::Scoped { students: Some(vec![requested.to_string()]), teacher: None }
            } else {
                ListScope::Empty
            }
        }
        (RecordScope::Authored(teacher), requested) => ListScope::Scoped {
            students: requested.map(|id| vec![id.to_string()]),
            teacher: Some(teacher),
        },
        (RecordScope::Unrestricted, requested) => {
            ListScope::Scoped { students: requested.map(|id| vec![id.to_string()]), teacher: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::{LetterGrade, Term};

    fn user(id: &str, role: UserRole, children: &[&str]) -> User {
        User {
            id: id.to_string(),
            full_name: "Test User".to_string(),
            role,
            class: None,
            children_ids: children.iter().map(|child| child.to_string()).collect(),
            is_active: true,
            created_at: primitive_now_utc(),
        }
    }

    fn record(student: &str, teacher: &str) -> ProgressRecord {
        let now = primitive_now_utc();
        ProgressRecord {
            id: "rec-1".to_string(),
            student: student.to_string(),
            teacher: teacher.to_string(),
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
    fn student_reads_only_own_records() {
        let rec = record("student-a", "teacher-1");
        assert!(can_read(&user("student-a", UserRole::Student, &[]), &rec));
        assert!(!can_read(&user("student-b", UserRole::Student, &[]), &rec));
    }

    #[test]
    fn parent_reads_only_children_records() {
        let rec = record("student-a", "teacher-1");
        assert!(can_read(&user("parent-1", UserRole::Parent, &["student-a"]), &rec));
        assert!(!can_read(&user("parent-2", UserRole::Parent, &["student-b"]), &rec));
    }

    #[test]
    fn teacher_reads_only_authored_records() {
        let rec = record("student-a", "teacher-1");
        assert!(can_read(&user("teacher-1", UserRole::Teacher, &[]), &rec));
        assert!(!can_read(&user("teacher-2", UserRole::Teacher, &[]), &rec));
    }

    #[test]
    fn admin_read_is_unrestricted_but_write_is_not() {
        let rec = record("student-a", "teacher-1");
        let admin = user("admin-1", UserRole::Admin, &[]);
        assert!(can_read(&admin, &rec));
        assert!(!can_write(&admin, &rec));
        assert!(!can_publish(&admin, &rec));
    }

    #[test]
    fn write_and_publish_require_owning_teacher() {
        let rec = record("student-a", "teacher-1");
        assert!(can_write(&user("teacher-1", UserRole::Teacher, &[]), &rec));
        assert!(can_publish(&user("teacher-1", UserRole::Teacher, &[]), &rec));
        assert!(!can_write(&user("teacher-2", UserRole::Teacher, &[]), &rec));
        assert!(!can_write(&user("student-a", UserRole::Student, &[]), &rec));
        assert!(!can_write(&user("parent-1", UserRole::Parent, &["student-a"]), &rec));
    }

    #[test]
    fn feedback_requires_parent_of_the_student() {
        let rec = record("student-b", "teacher-1");
        assert!(can_give_feedback(&user("parent-1", UserRole::Parent, &["student-b"]), &rec));
        // Parent of A asking about B's record is denied.
        assert!(!can_give_feedback(&user("parent-2", UserRole::Parent, &["student-a"]), &rec));
        assert!(!can_give_feedback(&user("teacher-1", UserRole::Teacher, &[]), &rec));
    }

    #[test]
    fn list_filter_narrows_but_never_broadens() {
        let student = user("student-a", UserRole::Student, &[]);
        assert_eq!(list_scope(&student, Some("student-b")), ListScope::Empty);

        let parent = user("parent-1", UserRole::Parent, &["child-1", "child-2"]);
        match list_scope(&parent, Some("child-2")) {
            ListScope::Scoped { students, teacher } => {
                assert_eq!(students, Some(vec!["child-2".to_string()]));
                assert_eq!(teacher, None);
            }
            ListScope::Empty => panic!("parent filter within scope must not be empty"),
        }
        assert_eq!(list_scope(&parent, Some("stranger")), ListScope::Empty);

        let teacher = user("teacher-1", UserRole::Teacher, &[]);
        match list_scope(&teacher, Some("student-a")) {
            ListScope::Scoped { students, teacher } => {
                assert_eq!(students, Some(vec!["student-a".to_string()]));
                assert_eq!(teacher, Some("teacher-1".to_string()));
            }
            ListScope::Empty => panic!("teacher scope keeps the authored filter"),
        }
    }
}
