use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One server row: column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

pub type RowSet = Vec<Row>;

/// Response from `/api/data/{report_type}/{mission_id}`.
///
/// Older servers return the bare row array; newer ones wrap it with cache metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DataResponse {
    Envelope(DataEnvelope),
    Bare(RowSet),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope {
    pub data: RowSet,
    #[serde(default)]
    pub cache_metadata: Option<CacheMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub cache_timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub last_data_timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub file_modification_time: Option<DateTime<Utc>>,
}

/// Normalized result of a chart data request, whichever shape the server used.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub rows: RowSet,
    pub cache_meta: Option<CacheMetadata>,
}

impl From<DataResponse> for ChartData {
    fn from(response: DataResponse) -> Self {
        match response {
            DataResponse::Envelope(envelope) => Self {
                rows: envelope.data,
                cache_meta: envelope.cache_metadata,
            },
            DataResponse::Bare(rows) => Self {
                rows,
                cache_meta: None,
            },
        }
    }
}

/// One entry of `/api/cache-status/{mission_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatusEntry {
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub cache_timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub last_data_timestamp: Option<DateTime<Utc>>,
}

/// Response from `/api/cache-status/{mission_id}`: report type to timestamps.
pub type CacheStatusResponse = HashMap<String, CacheStatusEntry>;

/// Raw representation for timestamps: RFC 3339, naive ISO (taken as UTC) or epoch seconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Epoch(f64),
}

fn parse_timestamp(raw: RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        // Fractional epoch seconds are truncated to whole seconds
        RawTimestamp::Epoch(secs) => DateTime::from_timestamp(secs as i64, 0),
    }
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(parse_timestamp))
}

/// Parse a row cell into a timestamp using the same rules as cache metadata.
#[must_use]
pub fn timestamp_from_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => parse_timestamp(RawTimestamp::Text(s.clone())),
        serde_json::Value::Number(n) => n.as_f64().and_then(|f| parse_timestamp(RawTimestamp::Epoch(f))),
        _ => None,
    }
}
