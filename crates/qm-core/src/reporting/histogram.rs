use crate::submission::Submission;
use serde::Serialize;

/// Fixed score ranges used by the distribution chart. Each range is
/// `lo < percent <= hi`; the first also swallows everything below zero,
/// the last everything above 100 (drifted catalogs can produce >100%).
const BUCKET_BOUNDS: &[(f64, &str)] = &[
    (50.0, "0-50"),
    (70.0, "50-70"),
    (80.0, "70-80"),
    (90.0, "80-90"),
    (100.0, "90-100"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub range: &'static str,
    pub count: usize,
}

/// Buckets every submission's percent into exactly one range; bucket
/// counts always sum to the number of submissions.
pub fn histogram<'a, I>(submissions: I) -> Vec<HistogramBucket>
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut counts = [0usize; BUCKET_BOUNDS.len()];

    for submission in submissions {
        let percent = submission.computed.percent;
        let index = BUCKET_BOUNDS
            .iter()
            .position(|(upper, _)| percent <= *upper)
            .unwrap_or(BUCKET_BOUNDS.len() - 1);
        counts[index] += 1;
    }

    BUCKET_BOUNDS
        .iter()
        .zip(counts)
        .map(|((_, range), count)| HistogramBucket { range, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{AnswerSet, Scorecard};

    fn submission(percent: f64) -> Submission {
        Submission {
            employee: "jane.doe@verbaneum.de".to_string(),
            evaluator: "eva.luator@verbaneum.de".to_string(),
            team: "A".to_string(),
            catalog: "Servicequalität".to_string(),
            submitted_at: None,
            answers: AnswerSet::new(),
            computed: Scorecard {
                points: 0.0,
                max_points: 0.0,
                percent,
            },
        }
    }

    #[test]
    fn boundary_values_fall_into_the_lower_bucket() {
        let submissions = vec![submission(50.0), submission(70.0), submission(70.01)];
        let buckets = histogram(&submissions);

        assert_eq!(buckets[0].range, "0-50");
        assert_eq!(buckets[0].count, 1); // exactly 50
        assert_eq!(buckets[1].count, 1); // exactly 70
        assert_eq!(buckets[2].count, 1); // just above 70
    }

    #[test]
    fn counts_sum_to_the_submission_count() {
        let submissions: Vec<Submission> = [0.0, 12.5, 50.0, 55.0, 75.0, 85.0, 95.0, 100.0]
            .iter()
            .map(|&p| submission(p))
            .collect();

        let buckets = histogram(&submissions);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, submissions.len());
    }

    #[test]
    fn drifted_percents_above_100_land_in_the_top_bucket() {
        let buckets = histogram(&[submission(104.0)]);
        assert_eq!(buckets[4].range, "90-100");
        assert_eq!(buckets[4].count, 1);
    }

    #[test]
    fn empty_input_yields_all_zero_buckets() {
        let buckets = histogram(&[]);
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.count == 0));
    }
}
