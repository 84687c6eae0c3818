use serde::{Deserialize, Serialize};

/// One row of the cognitive skills dataset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub engagement_time: f64,
    pub assessment_score: f64,
    pub persona: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

impl Student {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Comprehension => self.comprehension,
            Metric::Attention => self.attention,
            Metric::Focus => self.focus,
            Metric::Retention => self.retention,
            Metric::EngagementTime => self.engagement_time,
            Metric::AssessmentScore => self.assessment_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Comprehension,
    Attention,
    Focus,
    Retention,
    EngagementTime,
    AssessmentScore,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Comprehension,
        Metric::Attention,
        Metric::Focus,
        Metric::Retention,
        Metric::EngagementTime,
        Metric::AssessmentScore,
    ];

    /// Column name as it appears in the CSV header.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Comprehension => "comprehension",
            Metric::Attention => "attention",
            Metric::Focus => "focus",
            Metric::Retention => "retention",
            Metric::EngagementTime => "engagement_time",
            Metric::AssessmentScore => "assessment_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Comprehension => "Comprehension",
            Metric::Attention => "Attention",
            Metric::Focus => "Focus",
            Metric::Retention => "Retention",
            Metric::EngagementTime => "Engagement Time",
            Metric::AssessmentScore => "Assessment Score",
        }
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|metric| metric.key() == key)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Independent variables of the correlation analysis, in display order.
pub const SKILLS: [Metric; 5] = [
    Metric::Comprehension,
    Metric::Attention,
    Metric::Focus,
    Metric::Retention,
    Metric::EngagementTime,
];

/// Dependent variable every skill is correlated against.
pub const TARGET: Metric = Metric::AssessmentScore;

/// Parallel label/value arrays consumed by the bar and radar charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<Metric>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillCorrelation {
    pub skill: Metric,
    /// `None` when the skill is constant across the record set.
    pub coefficient: Option<f64>,
}
