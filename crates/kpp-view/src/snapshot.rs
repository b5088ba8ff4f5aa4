//! GeoJSON payload pushed to the map source.

use kpp_core::Checkpoint;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub id: String,
    pub name: String,
    /// Machine key, matched by the style's colour table.
    #[serde(rename = "type")]
    pub checkpoint_type: &'static str,
    pub status: &'static str,
    pub subject: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<MapFeature>,
}

impl MapFeatureCollection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.id.as_str())
    }
}

impl From<&Checkpoint> for MapFeature {
    fn from(c: &Checkpoint) -> Self {
        Self {
            kind: "Feature",
            id: c.id.clone(),
            geometry: PointGeometry {
                kind: "Point",
                coordinates: c.coordinates.to_array(),
            },
            properties: FeatureProperties {
                id: c.id.clone(),
                name: c.name.clone(),
                checkpoint_type: c.checkpoint_type.key(),
                status: c.status.key(),
                subject: c.subject.clone(),
                country: c.country.clone(),
            },
        }
    }
}

/// Builds the feature collection for the records at `view` positions.
#[must_use]
pub fn map_snapshot(all: &[Checkpoint], view: &[usize]) -> MapFeatureCollection {
    MapFeatureCollection {
        kind: "FeatureCollection",
        features: view.iter().map(|&i| MapFeature::from(&all[i])).collect(),
    }
}
