use crate::errors::KpiError;
use crate::models::{columns, Dataset, KpiRow};
use chrono::Local;
use std::{env, io::Read, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{info, warn};

pub const DEFAULT_DATA_PATH: &str = "data/Regenerated_Planet_Fitness_KPI_Dataset.csv";

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("KPI_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DATA_PATH)
}

pub async fn load_dataset(path: &Path) -> Result<Dataset, KpiError> {
    let source = path.display().to_string();
    let bytes = fs::read(path)
        .await
        .map_err(|err| KpiError::data_load(&source, err))?;
    let rows = parse_rows(&source, bytes.as_slice())?;

    if rows.is_empty() {
        warn!(path = %source, "dataset has a header but no rows");
    } else {
        info!(path = %source, rows = rows.len(), "loaded KPI dataset");
    }

    Ok(Dataset {
        source: path.to_path_buf(),
        loaded_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        rows,
    })
}

pub fn parse_rows<R: Read>(source: &str, input: R) -> Result<Vec<KpiRow>, KpiError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|err| KpiError::data_load(source, err))?
        .clone();
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(KpiError::Schema { missing });
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<KpiRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = result.map_err(|err| KpiError::data_load(source, format!("line {line}: {err}")))?;
        if let Some(column) = non_finite_column(&row) {
            return Err(KpiError::data_load(
                source,
                format!("line {line}: `{column}` is not a finite number"),
            ));
        }
        if row.equipment_downtime_hrs_month < 0.0 {
            return Err(KpiError::data_load(
                source,
                format!("line {line}: `{}` must not be negative", columns::DOWNTIME),
            ));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn non_finite_column(row: &KpiRow) -> Option<&'static str> {
    let checks = [
        (columns::SATISFACTION, row.avg_satisfaction_score),
        (columns::CHURN, row.monthly_churn_rate_pct),
        (columns::DOWNTIME, row.equipment_downtime_hrs_month),
        (columns::NPS_SCORE, row.nps_score.unwrap_or(0.0)),
    ];

    checks
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(column, _)| column)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Location,Avg_Satisfaction_Score (1-10),NPS_Promoters,NPS_Passives,NPS_Detractors,NPS_Score,Monthly_Churn_Rate (%),Equipment_Downtime (hrs/month)";

    fn csv_with(rows: &[&str]) -> String {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content
    }

    #[test]
    fn parses_rows_in_file_order() {
        let content = csv_with(&[
            "Boston,8.4,412,131,57,59.17,3.8,22.5",
            "Chicago,7.1,305,160,95,,5.6,41.75",
        ]);
        let rows = parse_rows("test.csv", content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "Boston");
        assert_eq!(rows[0].nps_score, Some(59.17));
        assert_eq!(rows[1].location, "Chicago");
        assert_eq!(rows[1].nps_score, None);
        assert_eq!(rows[1].equipment_downtime_hrs_month, 41.75);
    }

    #[test]
    fn nps_score_column_is_optional() {
        let content = "Location,Avg_Satisfaction_Score (1-10),NPS_Promoters,NPS_Passives,NPS_Detractors,Monthly_Churn_Rate (%),Equipment_Downtime (hrs/month)\nDenver,9.1,480,90,30,2.4,12.0";
        let rows = parse_rows("test.csv", content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].nps_score, None);
        assert!((rows[0].nps() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn missing_columns_are_reported_together() {
        let content = "Location,NPS_Promoters,NPS_Passives,NPS_Detractors,Monthly_Churn_Rate (%)\nDenver,1,2,3,4.0";
        match parse_rows("test.csv", content.as_bytes()) {
            Err(KpiError::Schema { missing }) => assert_eq!(
                missing,
                vec![
                    "Avg_Satisfaction_Score (1-10)".to_string(),
                    "Equipment_Downtime (hrs/month)".to_string(),
                ]
            ),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let content = HEADER.replace("Location", "location");
        assert!(matches!(
            parse_rows("test.csv", content.as_bytes()),
            Err(KpiError::Schema { .. })
        ));
    }

    #[test]
    fn non_numeric_cell_is_a_load_error() {
        let content = csv_with(&["Boston,high,412,131,57,59.17,3.8,22.5"]);
        match parse_rows("test.csv", content.as_bytes()) {
            Err(KpiError::DataLoad { path, reason }) => {
                assert_eq!(path, "test.csv");
                assert!(reason.starts_with("line 2:"), "{reason}");
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_cell_is_a_load_error() {
        let content = csv_with(&[
            "Boston,8.4,412,131,57,59.17,3.8,22.5",
            "Dallas,6.6,240,180,140,17.86,7.9,NaN",
        ]);
        match parse_rows("test.csv", content.as_bytes()) {
            Err(KpiError::DataLoad { reason, .. }) => {
                assert!(reason.contains("line 3"), "{reason}");
                assert!(reason.contains("Equipment_Downtime (hrs/month)"), "{reason}");
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn negative_downtime_is_a_load_error() {
        let content = csv_with(&[
            "Boston,8.4,412,131,57,59.17,3.8,0.0",
            "Miami,7.8,350,140,70,50.0,4.5,-3.5",
        ]);
        match parse_rows("test.csv", content.as_bytes()) {
            Err(KpiError::DataLoad { reason, .. }) => {
                assert!(reason.starts_with("line 3:"), "{reason}");
                assert!(reason.contains("must not be negative"), "{reason}");
            }
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let rows = parse_rows("test.csv", HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("kpi_missing_{}.csv", std::process::id()));
        let err = load_dataset(&path).await.unwrap_err();
        assert!(matches!(err, KpiError::DataLoad { .. }));
    }

    #[tokio::test]
    async fn loads_bundled_dataset() {
        let dataset = load_dataset(Path::new(DEFAULT_DATA_PATH)).await.unwrap();
        assert_eq!(dataset.rows.len(), 8);
        assert_eq!(dataset.source, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(!dataset.loaded_at.is_empty());
    }
}
