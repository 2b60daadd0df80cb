use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Parent,
    Teacher,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Term {
    Term1,
    Term2,
    Term3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AssessmentKind {
    Quiz,
    Test,
    Exam,
    Assignment,
    Project,
}

/// `P` is carried for store compatibility but never produced by grade
/// derivation; it can only appear via a direct external write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
    P,
}
