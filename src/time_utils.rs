// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Shared helpers for date/time handling.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a std duration into a chrono one, saturating on overflow.
pub fn chrono_duration(duration: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

/// Client-reported timestamp.
///
/// Browsers send either `Date.now()` (epoch milliseconds) or an ISO string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientTimestamp {
    EpochMillis(i64),
    Rfc3339(DateTime<Utc>),
}

impl ClientTimestamp {
    /// Resolve to a UTC instant. Out-of-range millisecond values yield `None`.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        match self {
            ClientTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(ms),
            ClientTimestamp::Rfc3339(dt) => Some(dt),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::EpochMillis).or_else(|| {
                n.as_f64()
                    .filter(|ms| ms.is_finite() && ms.abs() < i64::MAX as f64)
                    .map(|ms| Self::EpochMillis(ms.trunc() as i64))
            }),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| Self::Rfc3339(dt.with_timezone(&Utc))),
            _ => None,
        }
    }
}

/// Read an optional client timestamp without ever failing the payload.
///
/// Fractional milliseconds are truncated; values that are neither epoch
/// milliseconds nor RFC 3339 become `None`.
pub fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<ClientTimestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let parsed = ClientTimestamp::from_json(&raw);
        if parsed.is_none() {
            tracing::debug!(timestamp = %raw, "Ignoring unparseable client timestamp");
        }
        parsed
    }))
}
