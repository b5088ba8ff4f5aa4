//! Normalization from a raw GeoJSON feature collection to canonical
//! [`Checkpoint`] records.
//!
//! Field lookup is delegated to [`kpp_core::FieldTable`] and category
//! detection to [`kpp_core::classify`]; this module handles document shape,
//! geometry validation and identifier assignment.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use kpp_core::{classify_status, classify_type, Checkpoint, FieldTable, LngLat, LogicalField};
use serde_json::{Map, Value};

use crate::error::DataLoadError;
use crate::types::{Dataset, NormalizeReport};

/// Normalizes a parsed GeoJSON document using the built-in field table.
///
/// # Errors
///
/// See [`normalize`].
pub fn normalize_default(raw: &Value) -> Result<Dataset, DataLoadError> {
    normalize(raw, &FieldTable::default())
}

/// Normalizes a parsed GeoJSON document into the canonical checkpoint list.
///
/// Features without a valid point geometry are dropped. Features without an
/// identifier get a generated `gen-<uuid>` id. When two features share an
/// id the later one wins but keeps the earlier one's position.
///
/// # Errors
///
/// Returns [`DataLoadError::NotAFeatureCollection`] if the root is not an
/// object with a `features` array. Individual malformed features never fail
/// the load.
pub fn normalize(raw: &Value, table: &FieldTable) -> Result<Dataset, DataLoadError> {
    let root = raw
        .as_object()
        .ok_or_else(|| DataLoadError::NotAFeatureCollection {
            reason: "document root is not an object".into(),
        })?;

    if let Some(kind) = root.get("type").and_then(Value::as_str) {
        if kind != "FeatureCollection" {
            return Err(DataLoadError::NotAFeatureCollection {
                reason: format!("document type is \"{kind}\""),
            });
        }
    }

    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| DataLoadError::NotAFeatureCollection {
            reason: "missing \"features\" array".into(),
        })?;

    let mut report = NormalizeReport {
        features_read: features.len(),
        ..NormalizeReport::default()
    };
    let mut checkpoints: Vec<Checkpoint> = Vec::with_capacity(features.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(features.len());

    for (index, feature) in features.iter().enumerate() {
        let Some(coordinates) = point_coordinates(feature) else {
            tracing::debug!(index, "dropping feature without a valid point geometry");
            report.dropped_geometry += 1;
            continue;
        };

        let empty = Map::new();
        let props = feature
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let id = match resolve_id(feature, props, table) {
            Some(id) => id,
            None => {
                report.synthesized_ids += 1;
                format!("gen-{}", uuid::Uuid::new_v4())
            }
        };

        let checkpoint = Checkpoint::new(
            id,
            table.resolve(props, LogicalField::Name),
            classify_type(&table.resolve(props, LogicalField::Type)),
            classify_status(&table.resolve(props, LogicalField::Status)),
            table.resolve(props, LogicalField::Subject),
            table.resolve(props, LogicalField::Country),
            coordinates,
        );

        if let Some(&existing) = positions.get(&checkpoint.id) {
            tracing::warn!(
                index,
                id = %checkpoint.id,
                "duplicate checkpoint id; later record replaces earlier one"
            );
            report.duplicate_ids += 1;
            checkpoints[existing] = checkpoint;
        } else {
            positions.insert(checkpoint.id.clone(), checkpoints.len());
            checkpoints.push(checkpoint);
        }
    }

    report.kept = checkpoints.len();

    Ok(Dataset {
        checkpoints,
        updated_at: dataset_timestamp(root),
        report,
    })
}

/// Extracts `[lon, lat]` from a `Point` geometry, rejecting anything else.
fn point_coordinates(feature: &Value) -> Option<LngLat> {
    let geometry = feature.get("geometry")?.as_object()?;
    if geometry.get("type").and_then(Value::as_str) != Some("Point") {
        return None;
    }
    let coords = geometry.get("coordinates")?.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    LngLat::new(lon, lat)
}

/// Table candidates first, then the feature-level `id` member.
fn resolve_id(feature: &Value, props: &Map<String, Value>, table: &FieldTable) -> Option<String> {
    table.lookup(props, LogicalField::Id).or_else(|| {
        match feature.get("id")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}

fn dataset_timestamp(root: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let metadata = root.get("metadata")?.as_object()?;
    ["updated_at", "generated_at"]
        .iter()
        .filter_map(|key| metadata.get(*key).and_then(Value::as_str))
        .find_map(parse_timestamp)
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc());
    if parsed.is_none() {
        tracing::debug!(raw, "ignoring unparseable dataset timestamp");
    }
    parsed
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
