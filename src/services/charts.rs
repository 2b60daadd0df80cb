use crate::core::time::format_primitive;
use crate::schemas::progress::{
    ChartPayload, ChartPoint, SubjectAverageResponse, SubjectSeriesResponse,
};
use crate::services::analytics::{SeriesPoint, StudentSummary};

/// Shape a student summary for presentation: RFC3339 dates, the flat timeline
/// ascending by record creation time, and per-subject series in subject
/// insertion order. Series length always equals the number of contributing
/// records; nothing is resampled or gap-filled.
pub(crate) fn project(summary: &StudentSummary) -> ChartPayload {
    ChartPayload {
        subjects: summary
            .subjects
            .iter()
            .map(|series| SubjectSeriesResponse {
                subject: series.subject.clone(),
                points: series.points.iter().map(to_chart_point).collect(),
            })
            .collect(),
        timeline: summary.timeline.iter().map(to_chart_point).collect(),
        subject_averages: summary
            .subject_averages
            .iter()
            .map(|entry| SubjectAverageResponse {
                subject: entry.subject.clone(),
                average: entry.average,
            })
            .collect(),
        overall_average: summary.overall_average,
    }
}

fn to_chart_point(point: &SeriesPoint) -> ChartPoint {
    ChartPoint { date: format_primitive(point.date), score: point.score }
}
