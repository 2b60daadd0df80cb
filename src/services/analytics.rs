use time::PrimitiveDateTime;

use crate::db::models::ProgressRecord;

const TIP_POOL: [&str; 5] = [
    "Practice flashcards 15 minutes daily",
    "Complete past papers each weekend",
    "Schedule short focused study blocks (Pomodoro)",
    "Attend teacher office hours for difficult topics",
    "Form a small peer study group",
];

const TIPS_TAKEN: usize = 3;

const NO_RECORDS_SUMMARY: &str = "No progress records found";
const NO_RECORDS_SUGGESTIONS: [&str; 2] =
    ["Attend revision sessions", "Set a weekly study routine"];

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeriesPoint {
    pub(crate) date: PrimitiveDateTime,
    pub(crate) score: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct SubjectSeries {
    pub(crate) subject: String,
    pub(crate) points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubjectAverage {
    pub(crate) subject: String,
    pub(crate) average: f64,
}

/// Chart-side aggregation over one student's records (part A). Subjects keep
/// first-seen order; points keep record creation order. The overall average
/// here is the flat mean across records, which intentionally differs from the
/// insight-side mean of subject means in [`analyze`].
#[derive(Debug, Clone)]
pub(crate) struct StudentSummary {
    pub(crate) subjects: Vec<SubjectSeries>,
    pub(crate) timeline: Vec<SeriesPoint>,
    pub(crate) subject_averages: Vec<SubjectAverage>,
    pub(crate) overall_average: f64,
}

pub(crate) fn summarize(records: &[ProgressRecord]) -> StudentSummary {
    let mut subjects: Vec<SubjectSeries> = Vec::new();
    let mut timeline = Vec::with_capacity(records.len());

    for record in records {
        let point = SeriesPoint { date: record.created_at, score: record.average_score };

        match subjects.iter_mut().find(|series| series.subject == record.subject) {
            Some(series) => series.points.push(point.clone()),
            None => subjects
                .push(SubjectSeries { subject: record.subject.clone(), points: vec![point.clone()] }),
        }

        timeline.push(point);
    }

    let subject_averages = subjects
        .iter()
        .map(|series| SubjectAverage {
            subject: series.subject.clone(),
            average: round1(mean(series.points.iter().map(|point| point.score))),
        })
        .collect();

    let overall_average = round1(mean(timeline.iter().map(|point| point.score)));

    StudentSummary { subjects, timeline, subject_averages, overall_average }
}

/// Insight payload (part B). `overall_average` is the mean of the per-subject
/// means, one value per subject regardless of how many records each subject
/// holds.
#[derive(Debug, Clone)]
pub(crate) struct Insight {
    pub(crate) summary: Option<String>,
    pub(crate) overall_average: Option<f64>,
    pub(crate) per_subject: Option<Vec<SubjectAverage>>,
    pub(crate) weak_areas: Vec<String>,
    pub(crate) suggestions: Vec<String>,
}

pub(crate) fn analyze(records: &[ProgressRecord]) -> Insight {
    if records.is_empty() {
        return Insight {
            summary: Some(NO_RECORDS_SUMMARY.to_string()),
            overall_average: None,
            per_subject: None,
            weak_areas: Vec::new(),
            suggestions: NO_RECORDS_SUGGESTIONS.iter().map(|tip| tip.to_string()).collect(),
        };
    }

    let mut subjects: Vec<(String, f64, usize)> = Vec::new();
    for record in records {
        match subjects.iter_mut().find(|(subject, _, _)| *subject == record.subject) {
            Some((_, total, count)) => {
                *total += record.average_score;
                *count += 1;
            }
            None => subjects.push((record.subject.clone(), record.average_score, 1)),
        }
    }

    let subject_averages: Vec<(String, f64)> = subjects
        .into_iter()
        .map(|(subject, total, count)| (subject, total / count as f64))
        .collect();

    let overall_average = mean(subject_averages.iter().map(|(_, average)| *average));

    let weak_areas: Vec<String> = subject_averages
        .iter()
        .filter(|(_, average)| *average < overall_average || *average < 50.0)
        .map(|(subject, _)| subject.clone())
        .collect();

    // Suggestion order is fixed: low-overall lead-in, weak-area line, then the
    // head of the tip pool.
    let mut suggestions = Vec::new();
    if overall_average < 50.0 {
        suggestions.push("Focus on core concepts; review class notes daily".to_string());
    }
    if !weak_areas.is_empty() {
        suggestions.push(format!("Allocate extra practice time to: {}", weak_areas.join(", ")));
    }
    suggestions.extend(TIP_POOL.iter().take(TIPS_TAKEN).map(|tip| tip.to_string()));

    Insight {
        summary: None,
        overall_average: Some(round1(overall_average)),
        per_subject: Some(
            subject_averages
                .into_iter()
                .map(|(subject, average)| SubjectAverage { subject, average: round1(average) })
                .collect(),
        ),
        weak_areas,
        suggestions,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for value in values {
        total += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
