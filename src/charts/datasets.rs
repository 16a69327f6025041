//! Turning server rows into chart series.

use serde_json::Value;

use crate::api::models::{Row, timestamp_from_value};
use crate::charts::backend::{AxisConfig, AxisKind, Dataset};
use crate::charts::specs::{ChartSpec, TIMESTAMP_FIELDS};

/// Numbers, numeric strings and nulls. Anything else counts as a gap.
fn numeric(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn row_time_millis(row: &Row) -> Option<f64> {
    TIMESTAMP_FIELDS
        .iter()
        .find_map(|field| row.get(*field).and_then(timestamp_from_value))
        .map(|ts| ts.timestamp_millis() as f64)
}

/// One dataset per declared series, x in epoch milliseconds.
///
/// Rows without a parseable timestamp are skipped. Series with no non-null
/// value are left out entirely.
#[must_use]
pub fn extract_datasets(rows: &[Row], spec: &ChartSpec) -> Vec<Dataset> {
    let times: Vec<Option<f64>> = rows.iter().map(row_time_millis).collect();

    spec.series
        .iter()
        .map(|s| Dataset {
            label: s.label.to_string(),
            points: rows
                .iter()
                .zip(&times)
                .filter_map(|(row, t)| t.map(|x| (x, numeric(row.get(s.field)))))
                .collect(),
            color: Some(s.color.to_string()),
        })
        .filter(Dataset::is_plottable)
        .collect()
}

#[must_use]
pub fn axis_for(spec: &ChartSpec) -> AxisConfig {
    AxisConfig {
        x_kind: AxisKind::Time,
        x_title: Some("Time".to_string()),
        y_title: Some(spec.y_title.to_string()),
        ..AxisConfig::default()
    }
}

/// Wave energy density against frequency.
///
/// Accepts a bare array of points or an object wrapping them in `data`.
#[must_use]
pub fn spectrum_datasets(payload: &Value) -> Vec<Dataset> {
    let points = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => obj
            .get("data")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    };

    let series: Vec<(f64, Option<f64>)> = points
        .iter()
        .filter_map(|p| {
            let x = numeric(p.get("freq").or_else(|| p.get("frequency")))?;
            let y = numeric(p.get("efth").or_else(|| p.get("energy_density")));
            Some((x, y))
        })
        .collect();

    let dataset = Dataset {
        label: "Energy Density (m²/Hz)".to_string(),
        points: series,
        color: Some("#0d6efd".to_string()),
    };
    if dataset.is_plottable() {
        vec![dataset]
    } else {
        Vec::new()
    }
}

#[must_use]
pub fn spectrum_axis() -> AxisConfig {
    AxisConfig {
        x_kind: AxisKind::Linear,
        x_title: Some("Frequency (Hz)".to_string()),
        y_title: Some("Energy Density (m²/Hz)".to_string()),
        ..AxisConfig::default()
    }
}
