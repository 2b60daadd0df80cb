use crate::db::models::Assessment;
use crate::db::types::LetterGrade;

/// Derive the average score and letter grade from a set of assessments.
///
/// The average is the unweighted arithmetic mean of raw `score` values;
/// `max_score` does not participate even when it varies per assessment. The
/// two values are always derived together so a record can never carry an
/// average from one assessment list and a grade from another.
pub(crate) fn compute(assessments: &[Assessment]) -> (f64, LetterGrade) {
    let average = if assessments.is_empty() {
        0.0
    } else {
        let total: f64 = assessments.iter().map(|assessment| assessment.score).sum();
        total / assessments.len() as f64
    };

    (average, grade_for(average))
}

/// Grade bands, evaluated high to low with inclusive lower bounds.
pub(crate) fn grade_for(average: f64) -> LetterGrade {
    if average >= 80.0 {
        LetterGrade::A
    } else if average >= 70.0 {
        LetterGrade::B
    } else if average >= 60.0 {
        LetterGrade::C
    } else if average >= 50.0 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::AssessmentKind;

    fn assessment(score: f64, max_score: f64) -> Assessment {
        Assessment {
            name: "Assessment".to_string(),
            score,
            max_score,
            date: primitive_now_utc(),
            kind: AssessmentKind::Test,
            comments: None,
        }
    }

    #[test]
    fn average_is_unweighted_mean_of_scores() {
        let (average, grade) = compute(&[assessment(90.0, 100.0), assessment(70.0, 100.0)]);
        assert_eq!(average, 80.0);
        assert_eq!(grade, LetterGrade::A);
    }

    #[test]
    fn max_score_does_not_weight_the_average() {
        let (average, _) = compute(&[assessment(40.0, 50.0), assessment(60.0, 200.0)]);
        assert_eq!(average, 50.0);
    }

    #[test]
    fn empty_assessments_yield_zero_and_f() {
        let (average, grade) = compute(&[]);
        assert_eq!(average, 0.0);
        assert_eq!(grade, LetterGrade::F);
    }

    #[test]
    fn single_assessment_matches_equivalent_average() {
        let (single_avg, single_grade) = compute(&[assessment(55.0, 100.0)]);
        let (multi_avg, multi_grade) = compute(&[assessment(50.0, 100.0), assessment(60.0, 100.0)]);
        assert_eq!(single_avg, 55.0);
        assert_eq!(multi_avg, 55.0);
        assert_eq!(single_grade, LetterGrade::D);
        assert_eq!(multi_grade, LetterGrade::D);
    }

    #[test]
    fn grade_band_boundaries_are_inclusive_low() {
        assert_eq!(grade_for(80.0), LetterGrade::A);
        assert_eq!(grade_for(79.9), LetterGrade::B);
        assert_eq!(grade_for(70.0), LetterGrade::B);
        assert_eq!(grade_for(69.9), LetterGrade::C);
        assert_eq!(grade_for(60.0), LetterGrade::C);
        assert_eq!(grade_for(59.9), LetterGrade::D);
        assert_eq!(grade_for(50.0), LetterGrade::D);
        assert_eq!(grade_for(49.9), LetterGrade::F);
        assert_eq!(grade_for(0.0), LetterGrade::F);
    }
}
