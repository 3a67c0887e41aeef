//! Positive/negative calls, risk buckets, and summary figures for a result set.

use crate::results::ResultSet;
use shared::{Disease, ThresholdMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBucket {
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
}

impl RiskBucket {
    /// Bucket by probability alone; thresholds play no part.
    pub fn for_probability(prob: f64) -> Self {
        if prob >= 0.8 {
            RiskBucket::High
        } else if prob >= 0.6 {
            RiskBucket::MediumHigh
        } else if prob >= 0.4 {
            RiskBucket::Medium
        } else if prob >= 0.2 {
            RiskBucket::MediumLow
        } else {
            RiskBucket::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBucket::Low => "Low",
            RiskBucket::MediumLow => "Medium-Low",
            RiskBucket::Medium => "Medium",
            RiskBucket::MediumHigh => "Medium-High",
            RiskBucket::High => "High",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RiskBucket::Low => "risk-low",
            RiskBucket::MediumLow => "risk-medium-low",
            RiskBucket::Medium => "risk-medium",
            RiskBucket::MediumHigh => "risk-medium-high",
            RiskBucket::High => "risk-high",
        }
    }
}

pub fn is_positive(prob: f64, threshold: f64) -> bool {
    prob >= threshold
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseCall {
    pub disease: Disease,
    pub probability: f64,
    pub threshold: f64,
    pub positive: bool,
    pub risk: RiskBucket,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub positive_count: usize,
    /// Mean probability as a percentage, rounded to one decimal.
    pub mean_percent: f64,
    pub top_disease: Disease,
    pub top_probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub calls: Vec<DiseaseCall>,
    pub summary: Summary,
}

pub fn classify(results: &ResultSet, thresholds: &ThresholdMap) -> Classification {
    let calls: Vec<DiseaseCall> = results
        .iter()
        .map(|(disease, probability)| {
            let threshold = thresholds.get(disease);
            DiseaseCall {
                disease,
                probability,
                threshold,
                positive: is_positive(probability, threshold),
                risk: RiskBucket::for_probability(probability),
            }
        })
        .collect();

    let positive_count = calls.iter().filter(|c| c.positive).count();
    let mean = calls.iter().map(|c| c.probability).sum::<f64>() / calls.len() as f64;

    // Strict comparison keeps the earliest disease on ties.
    let mut top = calls[0];
    for call in &calls[1..] {
        if call.probability > top.probability {
            top = *call;
        }
    }

    Classification {
        summary: Summary {
            positive_count,
            mean_percent: (mean * 1000.0).round() / 10.0,
            top_disease: top.disease,
            top_probability: top.probability,
        },
        calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::reference_thresholds;

    fn results(probs: [f64; 6]) -> ResultSet {
        ResultSet::from_fn(|d| probs[d.index()])
    }

    #[test]
    fn risk_bucket_edges() {
        assert_eq!(RiskBucket::for_probability(1.0), RiskBucket::High);
        assert_eq!(RiskBucket::for_probability(0.8), RiskBucket::High);
        assert_eq!(RiskBucket::for_probability(0.79), RiskBucket::MediumHigh);
        assert_eq!(RiskBucket::for_probability(0.6), RiskBucket::MediumHigh);
        assert_eq!(RiskBucket::for_probability(0.4), RiskBucket::Medium);
        assert_eq!(RiskBucket::for_probability(0.2), RiskBucket::MediumLow);
        assert_eq!(RiskBucket::for_probability(0.19), RiskBucket::Low);
        assert_eq!(RiskBucket::for_probability(0.0), RiskBucket::Low);
    }

    #[test]
    fn positive_is_inclusive() {
        for step in 0..=20 {
            let p = step as f64 / 20.0;
            for t_step in 0..=20 {
                let t = t_step as f64 / 20.0;
                assert_eq!(is_positive(p, t), p >= t);
            }
        }
        assert!(is_positive(0.3, 0.3));
    }

    #[test]
    fn reference_example() {
        let set = results([0.9, 0.1, 0.3, 0.5, 0.2, 0.05]);
        let classification = classify(&set, &reference_thresholds());

        let positives: Vec<Disease> = classification
            .calls
            .iter()
            .filter(|c| c.positive)
            .map(|c| c.disease)
            .collect();
        assert_eq!(
            positives,
            vec![Disease::Atelectasis, Disease::LungOpacity, Disease::PleuralEffusion]
        );
        assert_eq!(classification.summary.positive_count, 3);
        assert_eq!(classification.summary.mean_percent, 34.2);
        assert_eq!(classification.summary.top_disease, Disease::Atelectasis);
        assert_eq!(classification.calls[0].risk, RiskBucket::High);
        assert_eq!(classification.calls[5].risk, RiskBucket::Low);
    }

    #[test]
    fn ties_resolve_to_first_disease() {
        let set = results([0.2, 0.7, 0.7, 0.1, 0.7, 0.0]);
        let classification = classify(&set, &ThresholdMap::uniform(0.5));
        assert_eq!(classification.summary.top_disease, Disease::Edema);
        assert_eq!(classification.summary.positive_count, 3);
    }

    #[test]
    fn calls_carry_current_threshold() {
        let set = results([0.5; 6]);
        let thresholds = ThresholdMap::uniform(0.6).with(Disease::Pneumonia, 0.5);
        let classification = classify(&set, &thresholds);
        let pneumonia = classification.calls[Disease::Pneumonia.index()];
        assert!(pneumonia.positive);
        assert_eq!(pneumonia.threshold, 0.5);
        assert_eq!(classification.summary.positive_count, 1);
        assert_eq!(classification.summary.mean_percent, 50.0);
    }
}
