pub(crate) mod access;
pub(crate) mod analytics;
pub(crate) mod charts;
pub(crate) mod grading;
pub(crate) mod publication;
