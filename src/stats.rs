use crate::errors::KpiError;
use crate::models::{
    Dataset, DashboardParams, DerivedView, DowntimeEntry, DowntimeRating, DowntimeSeverity,
    KpiRow, LocationFilter, NpsBreakdown, Summary, ALL_LOCATIONS,
};
use std::collections::BTreeSet;
use std::str::FromStr;

pub const DOWNTIME_MEDIUM_HRS: f64 = 30.0;
pub const DOWNTIME_HIGH_HRS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DowntimePolicy {
    #[default]
    LowerIsBetter,
    HigherIsBetter,
}

impl DowntimePolicy {
    pub fn rate(self, severity: DowntimeSeverity) -> DowntimeRating {
        match (self, severity) {
            (_, DowntimeSeverity::Medium) => DowntimeRating::Warning,
            (Self::LowerIsBetter, DowntimeSeverity::Low)
            | (Self::HigherIsBetter, DowntimeSeverity::High) => DowntimeRating::Good,
            (Self::LowerIsBetter, DowntimeSeverity::High)
            | (Self::HigherIsBetter, DowntimeSeverity::Low) => DowntimeRating::Bad,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowerIsBetter => "lower-is-better",
            Self::HigherIsBetter => "higher-is-better",
        }
    }
}

impl FromStr for DowntimePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lower-is-better" | "lower" => Ok(Self::LowerIsBetter),
            "higher-is-better" | "higher" | "legacy" => Ok(Self::HigherIsBetter),
            other => Err(format!(
                "unknown downtime policy '{other}', expected 'lower-is-better' or 'higher-is-better'"
            )),
        }
    }
}

pub fn filter<'a>(rows: &'a [KpiRow], location: &LocationFilter, threshold: f64) -> Vec<&'a KpiRow> {
    rows.iter()
        .filter(|row| location.matches(&row.location) && row.avg_satisfaction_score >= threshold)
        .collect()
}

pub fn summarize(rows: &[&KpiRow]) -> Result<Summary, KpiError> {
    if rows.is_empty() {
        return Err(KpiError::EmptyResult);
    }

    let count = rows.len() as f64;
    let mean = |value: fn(&KpiRow) -> f64| rows.iter().map(|row| value(row)).sum::<f64>() / count;

    Ok(Summary {
        row_count: rows.len(),
        mean_satisfaction: mean(|row| row.avg_satisfaction_score),
        mean_nps: mean(KpiRow::nps),
        mean_churn_pct: mean(|row| row.monthly_churn_rate_pct),
        mean_downtime_hrs: mean(|row| row.equipment_downtime_hrs_month),
    })
}

pub fn classify_downtime(hours: f64) -> DowntimeSeverity {
    if hours < DOWNTIME_MEDIUM_HRS {
        DowntimeSeverity::Low
    } else if hours < DOWNTIME_HIGH_HRS {
        DowntimeSeverity::Medium
    } else {
        DowntimeSeverity::High
    }
}

pub fn downtime_table(rows: &[&KpiRow], policy: DowntimePolicy) -> Vec<DowntimeEntry> {
    rows.iter()
        .map(|row| {
            let hours = row.equipment_downtime_hrs_month;
            let severity = classify_downtime(hours);
            let rating = policy.rate(severity);
            DowntimeEntry {
                location: row.location.clone(),
                downtime_hrs: hours,
                formatted: format!("{hours:.2}"),
                severity,
                rating,
                color: rating.color().to_string(),
            }
        })
        .collect()
}

pub fn nps_breakdown(rows: &[KpiRow]) -> Vec<NpsBreakdown> {
    let mut breakdown: Vec<NpsBreakdown> = rows
        .iter()
        .map(|row| NpsBreakdown {
            location: row.location.clone(),
            promoters: row.nps_promoters,
            passives: row.nps_passives,
            detractors: row.nps_detractors,
        })
        .collect();
    breakdown.sort_by(|a, b| a.location.cmp(&b.location));
    breakdown
}

pub fn location_options(rows: &[KpiRow]) -> Vec<String> {
    let distinct: BTreeSet<&str> = rows.iter().map(|row| row.location.as_str()).collect();
    std::iter::once(ALL_LOCATIONS.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

pub fn on_parameters_changed(
    dataset: &Dataset,
    params: &DashboardParams,
    policy: DowntimePolicy,
) -> Result<DerivedView, KpiError> {
    let filtered = filter(&dataset.rows, &params.location, params.min_satisfaction);
    let summary = summarize(&filtered)?;
    let downtime_table = params
        .show_table
        .then(|| downtime_table(&filtered, policy));

    Ok(DerivedView {
        params: params.clone(),
        rows: filtered.into_iter().cloned().collect(),
        summary,
        nps_by_location: nps_breakdown(&dataset.rows),
        downtime_table,
    })
}
