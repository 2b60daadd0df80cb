use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct SubjectAverageEntry {
    pub(crate) subject: String,
    pub(crate) avg: f64,
}

/// Insight payload. The empty-history shape carries `summary` with no
/// averages; the populated shape carries the averages with no summary.
#[derive(Debug, Serialize)]
pub(crate) struct AnalysisResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) overall_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) per_subject: Option<Vec<SubjectAverageEntry>>,
    pub(crate) weak_areas: Vec<String>,
    pub(crate) suggestions: Vec<String>,
}
