//! Retention and stickiness analysis over dated snapshots.
//!
//! Everything here is pure: the dashboards re-derive the full series from the
//! stored rows on every request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CohortRecord, StickinessRecord};
use crate::validation::{subset_count, ValidationError};

/// A dated numerator/denominator pair that yields a percentage.
pub trait MetricSource {
    fn id(&self) -> Option<Uuid> {
        None
    }
    fn date(&self) -> NaiveDate;
    fn numerator(&self) -> i64;
    fn denominator(&self) -> i64;
}

impl MetricSource for CohortRecord {
    fn id(&self) -> Option<Uuid> {
        Some(self.id)
    }
    fn date(&self) -> NaiveDate {
        self.cohort_date
    }
    fn numerator(&self) -> i64 {
        self.retained_users
    }
    fn denominator(&self) -> i64 {
        self.total_users
    }
}

impl MetricSource for StickinessRecord {
    fn id(&self) -> Option<Uuid> {
        Some(self.id)
    }
    fn date(&self) -> NaiveDate {
        self.analysis_date
    }
    fn numerator(&self) -> i64 {
        self.dau
    }
    fn denominator(&self) -> i64 {
        self.mau
    }
}

/// Unsaved cohort numbers, for what-if analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionSample {
    pub cohort_date: NaiveDate,
    pub total_users: i64,
    pub retained_users: i64,
}

impl RetentionSample {
    pub fn validate(&self) -> Result<(), ValidationError> {
        subset_count(
            "retained_users",
            self.retained_users,
            "total_users",
            self.total_users,
        )
    }
}

impl MetricSource for RetentionSample {
    fn date(&self) -> NaiveDate {
        self.cohort_date
    }
    fn numerator(&self) -> i64 {
        self.retained_users
    }
    fn denominator(&self) -> i64 {
        self.total_users
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StickinessSample {
    pub analysis_date: NaiveDate,
    pub dau: i64,
    pub mau: i64,
}

impl StickinessSample {
    pub fn validate(&self) -> Result<(), ValidationError> {
        subset_count("dau", self.dau, "mau", self.mau)
    }
}

impl MetricSource for StickinessSample {
    fn date(&self) -> NaiveDate {
        self.analysis_date
    }
    fn numerator(&self) -> i64 {
        self.dau
    }
    fn denominator(&self) -> i64 {
        self.mau
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Retention,
    Stickiness,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Positive,
    Negative,
    Stable,
}

impl Outcome {
    pub fn classify(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 0.0 => Self::Positive,
            Some(c) if c < 0.0 => Self::Negative,
            _ => Self::Stable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Stable => "Stable",
        }
    }

    pub fn recommendation(&self, kind: MetricKind) -> &'static str {
        match (kind, self) {
            (MetricKind::Retention, Self::Positive) => {
                "Retention is improving. Keep investing in the onboarding and engagement changes that shipped for this cohort."
            }
            (MetricKind::Retention, Self::Negative) => {
                "Retention dropped. Review recent product changes, interview churned users and tighten the activation path."
            }
            (MetricKind::Retention, Self::Stable) => {
                "Retention is flat. Run targeted experiments on onboarding and re-engagement to find the next lever."
            }
            (MetricKind::Stickiness, Self::Positive) => {
                "Users are coming back more often. Double down on the habit-forming features driving daily usage."
            }
            (MetricKind::Stickiness, Self::Negative) => {
                "Engagement frequency fell. Check notification quality and whether the core loop still delivers value daily."
            }
            (MetricKind::Stickiness, Self::Stable) => {
                "Engagement frequency is steady. Look for triggers that turn monthly users into weekly and daily users."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub id: Option<Uuid>,
    pub date: NaiveDate,
    pub numerator: i64,
    pub denominator: i64,
    pub rate: f64,
    pub change: Option<f64>,
    pub outcome: Outcome,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSummary {
    pub count: usize,
    pub average_rate: Option<f64>,
    pub latest_rate: Option<f64>,
    pub latest_outcome: Option<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricAnalysis {
    pub kind: MetricKind,
    pub points: Vec<MetricPoint>,
    pub summary: MetricSummary,
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// Relative change in percent; undefined when the previous rate is 0.
pub fn percentage_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

pub fn analyze<T: MetricSource>(kind: MetricKind, records: &[T]) -> MetricAnalysis {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by_key(|r| r.date());

    let mut points = Vec::with_capacity(sorted.len());
    let mut previous: Option<f64> = None;
    for record in sorted {
        let rate = ratio(record.numerator(), record.denominator());
        let change = previous.and_then(|prev| percentage_change(prev, rate));
        let outcome = Outcome::classify(change);
        points.push(MetricPoint {
            id: record.id(),
            date: record.date(),
            numerator: record.numerator(),
            denominator: record.denominator(),
            rate,
            change,
            outcome,
            recommendation: outcome.recommendation(kind).to_string(),
        });
        previous = Some(rate);
    }

    let summary = summarize(&points);
    MetricAnalysis {
        kind,
        points,
        summary,
    }
}

fn summarize(points: &[MetricPoint]) -> MetricSummary {
    let average_rate = if points.is_empty() {
        None
    } else {
        Some(points.iter().map(|p| p.rate).sum::<f64>() / points.len() as f64)
    };
    let latest = points.last();
    MetricSummary {
        count: points.len(),
        average_rate,
        latest_rate: latest.map(|p| p.rate),
        latest_outcome: latest.map(|p| p.outcome),
    }
}

pub fn analyze_cohorts<T: MetricSource>(records: &[T]) -> MetricAnalysis {
    analyze(MetricKind::Retention, records)
}

pub fn analyze_stickiness<T: MetricSource>(records: &[T]) -> MetricAnalysis {
    analyze(MetricKind::Stickiness, records)
}
