//! CSV snapshot importer for registry exports. Blank cells become `None`;
//! malformed cells fail the import with the offending row number so analysts
//! can fix the export rather than silently losing a metric.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{OwnershipComplexity, ProviderId, ProviderScoreInputs, Tier};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotImportError {
    #[error("failed to read provider export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid provider CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ProviderScoreInputs>, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ProviderScoreInputs>, SnapshotImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in csv_reader.deserialize::<SnapshotRow>().enumerate() {
            // Header is line 1; data rows start at 2.
            let row_number = index + 2;
            let row = row?;
            records.push(row.into_inputs(row_number)?);
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "Provider ID")]
    provider_id: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "ADC", default, deserialize_with = "empty_string_as_none")]
    adc: Option<String>,
    #[serde(rename = "Quality Score", default, deserialize_with = "empty_string_as_none")]
    quality_score: Option<String>,
    #[serde(rename = "Compliance Score", default, deserialize_with = "empty_string_as_none")]
    compliance_score: Option<String>,
    #[serde(rename = "Operational Score", default, deserialize_with = "empty_string_as_none")]
    operational_score: Option<String>,
    #[serde(rename = "Market Score", default, deserialize_with = "empty_string_as_none")]
    market_score: Option<String>,
    #[serde(rename = "CON State", default)]
    con_state: String,
    #[serde(rename = "PE Backed", default)]
    pe_backed: String,
    #[serde(rename = "Chain Affiliated", default)]
    chain_affiliated: String,
    #[serde(rename = "Ownership Complexity", default, deserialize_with = "empty_string_as_none")]
    ownership_complexity: Option<String>,
    #[serde(rename = "Net Income", default, deserialize_with = "empty_string_as_none")]
    net_income: Option<String>,
    #[serde(rename = "Total Revenue", default, deserialize_with = "empty_string_as_none")]
    total_revenue: Option<String>,
    #[serde(rename = "Pct 65 Plus", default, deserialize_with = "empty_string_as_none")]
    pct_65_plus: Option<String>,
    #[serde(rename = "Baseline Overall Score", default, deserialize_with = "empty_string_as_none")]
    baseline_overall_score: Option<String>,
    #[serde(rename = "Baseline Tier", default, deserialize_with = "empty_string_as_none")]
    baseline_tier: Option<String>,
}

impl SnapshotRow {
    fn into_inputs(self, row: usize) -> Result<ProviderScoreInputs, SnapshotImportError> {
        Ok(ProviderScoreInputs {
            provider_id: ProviderId(self.provider_id),
            state: self.state,
            adc: parse_metric(row, "ADC", self.adc)?,
            quality_score: parse_metric(row, "Quality Score", self.quality_score)?,
            compliance_score: parse_metric(row, "Compliance Score", self.compliance_score)?,
            operational_score: parse_metric(row, "Operational Score", self.operational_score)?,
            market_score: parse_metric(row, "Market Score", self.market_score)?,
            con_state: parse_flag(&self.con_state),
            pe_backed: parse_flag(&self.pe_backed),
            chain_affiliated: parse_flag(&self.chain_affiliated),
            ownership_complexity: parse_complexity(row, self.ownership_complexity)?,
            net_income: parse_metric(row, "Net Income", self.net_income)?,
            total_revenue: parse_metric(row, "Total Revenue", self.total_revenue)?,
            pct_65_plus: parse_metric(row, "Pct 65 Plus", self.pct_65_plus)?,
            baseline_overall_score: parse_metric(
                row,
                "Baseline Overall Score",
                self.baseline_overall_score,
            )?,
            baseline_tier: parse_tier(row, self.baseline_tier)?,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_metric(
    row: usize,
    column: &str,
    value: Option<String>,
) -> Result<Option<f64>, SnapshotImportError> {
    value
        .map(|raw| {
            raw.trim()
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| SnapshotImportError::Row {
                    row,
                    message: format!("'{raw}' is not a number in column '{column}'"),
                })
        })
        .transpose()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

fn parse_complexity(
    row: usize,
    value: Option<String>,
) -> Result<OwnershipComplexity, SnapshotImportError> {
    match value {
        None => Ok(OwnershipComplexity::Simple),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(OwnershipComplexity::Simple),
            "moderate" => Ok(OwnershipComplexity::Moderate),
            "complex" => Ok(OwnershipComplexity::Complex),
            _ => Err(SnapshotImportError::Row {
                row,
                message: format!("'{raw}' is not an ownership complexity"),
            }),
        },
    }
}

fn parse_tier(row: usize, value: Option<String>) -> Result<Option<Tier>, SnapshotImportError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_uppercase().as_str() {
            "GREEN" => Ok(Some(Tier::Green)),
            "YELLOW" => Ok(Some(Tier::Yellow)),
            "RED" => Ok(Some(Tier::Red)),
            _ => Err(SnapshotImportError::Row {
                row,
                message: format!("'{raw}' is not a tier"),
            }),
        },
    }
}
