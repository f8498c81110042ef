use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

pub const ALL_LOCATIONS: &str = "All";
pub const SATISFACTION_SLIDER_MIN: f64 = 6.0;
pub const SATISFACTION_SLIDER_MAX: f64 = 10.0;
pub const SATISFACTION_SLIDER_STEP: f64 = 0.1;
pub const DEFAULT_MIN_SATISFACTION: f64 = 7.0;

pub mod columns {
    pub const LOCATION: &str = "Location";
    pub const SATISFACTION: &str = "Avg_Satisfaction_Score (1-10)";
    pub const NPS_PROMOTERS: &str = "NPS_Promoters";
    pub const NPS_PASSIVES: &str = "NPS_Passives";
    pub const NPS_DETRACTORS: &str = "NPS_Detractors";
    pub const NPS_SCORE: &str = "NPS_Score";
    pub const CHURN: &str = "Monthly_Churn_Rate (%)";
    pub const DOWNTIME: &str = "Equipment_Downtime (hrs/month)";

    pub const REQUIRED: [&str; 7] = [
        LOCATION,
        SATISFACTION,
        NPS_PROMOTERS,
        NPS_PASSIVES,
        NPS_DETRACTORS,
        CHURN,
        DOWNTIME,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRow {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Avg_Satisfaction_Score (1-10)")]
    pub avg_satisfaction_score: f64,
    #[serde(rename = "NPS_Promoters")]
    pub nps_promoters: u32,
    #[serde(rename = "NPS_Passives")]
    pub nps_passives: u32,
    #[serde(rename = "NPS_Detractors")]
    pub nps_detractors: u32,
    #[serde(rename = "NPS_Score", default)]
    pub nps_score: Option<f64>,
    #[serde(rename = "Monthly_Churn_Rate (%)")]
    pub monthly_churn_rate_pct: f64,
    #[serde(rename = "Equipment_Downtime (hrs/month)")]
    pub equipment_downtime_hrs_month: f64,
}

impl KpiRow {
    pub fn nps(&self) -> f64 {
        if let Some(score) = self.nps_score {
            return score;
        }

        let total = u64::from(self.nps_promoters)
            + u64::from(self.nps_passives)
            + u64::from(self.nps_detractors);
        if total == 0 {
            return 0.0;
        }

        (f64::from(self.nps_promoters) - f64::from(self.nps_detractors)) / total as f64 * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub loaded_at: String,
    pub rows: Vec<KpiRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    All,
    Exact(String),
}

impl LocationFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == ALL_LOCATIONS {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    pub fn matches(&self, location: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(name) => name == location,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_LOCATIONS,
            Self::Exact(name) => name,
        }
    }
}

impl Serialize for LocationFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardParams {
    pub location: LocationFilter,
    #[serde(with = "threshold")]
    pub min_satisfaction: f64,
    pub show_table: bool,
}

// JSON has no encoding for infinities, so non-finite thresholds travel as "inf", "-inf" or "NaN".
mod threshold {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(value),
            Raw::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid satisfaction threshold '{text}'"))),
        }
    }
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            location: LocationFilter::All,
            min_satisfaction: DEFAULT_MIN_SATISFACTION,
            show_table: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub row_count: usize,
    pub mean_satisfaction: f64,
    pub mean_nps: f64,
    pub mean_churn_pct: f64,
    pub mean_downtime_hrs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeRating {
    Good,
    Warning,
    Bad,
}

impl DowntimeRating {
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "lightgreen",
            Self::Warning => "khaki",
            Self::Bad => "lightcoral",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowntimeEntry {
    pub location: String,
    pub downtime_hrs: f64,
    pub formatted: String,
    pub severity: DowntimeSeverity,
    pub rating: DowntimeRating,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsBreakdown {
    pub location: String,
    pub promoters: u32,
    pub passives: u32,
    pub detractors: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedView {
    pub params: DashboardParams,
    pub rows: Vec<KpiRow>,
    pub summary: Summary,
    pub nps_by_location: Vec<NpsBreakdown>,
    pub downtime_table: Option<Vec<DowntimeEntry>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub source: String,
    pub row_count: usize,
    pub loaded_at: String,
}
