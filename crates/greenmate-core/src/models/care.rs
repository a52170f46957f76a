use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::weather::{ResolvedLocation, WeatherObservation};

/// What part of plant care a recommendation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CareCategory {
    Watering,
    Fertilizing,
    Humidity,
    Light,
    Temperature,
    General,
}

impl Display for CareCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            CareCategory::Watering => "watering",
            CareCategory::Fertilizing => "fertilizing",
            CareCategory::Humidity => "humidity",
            CareCategory::Light => "light",
            CareCategory::Temperature => "temperature",
            CareCategory::General => "general",
        };
        f.write_str(s)
    }
}

/// Recommendation urgency. Variants are declared in ascending order so the
/// derived `Ord` matches the rank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Numeric rank: low 1, medium 2, high 3, urgent 4.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CareRecommendation {
    #[serde(rename = "type")]
    pub category: CareCategory,
    pub priority: Priority,
    pub action: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
}

impl CareRecommendation {
    pub fn new(
        category: CareCategory,
        priority: Priority,
        action: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            category,
            priority,
            action: action.into(),
            reason: reason.into(),
            due_at: None,
        }
    }
}

/// Weather snapshot plus the recommendations derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherCareReport {
    pub location: ResolvedLocation,
    pub weather: WeatherObservation,
    pub recommendations: Vec<CareRecommendation>,
    pub forecast: String,
    pub last_updated: DateTime<Utc>,
}
