//! Canonical checkpoint record and its closed categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transport mode of a border crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointType {
    Automobile,
    Rail,
    Air,
    Sea,
    River,
    Pedestrian,
    Other,
}

impl CheckpointType {
    pub const ALL: [CheckpointType; 7] = [
        CheckpointType::Automobile,
        CheckpointType::Rail,
        CheckpointType::Air,
        CheckpointType::Sea,
        CheckpointType::River,
        CheckpointType::Pedestrian,
        CheckpointType::Other,
    ];

    /// Russian display label, as shown in filters, popups and the legend.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CheckpointType::Automobile => "Автомобильный",
            CheckpointType::Rail => "Железнодорожный",
            CheckpointType::Air => "Воздушный",
            CheckpointType::Sea => "Морской",
            CheckpointType::River => "Речной",
            CheckpointType::Pedestrian => "Пешеходный",
            CheckpointType::Other => "Другое",
        }
    }

    /// Stable machine key, matching the serde representation.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            CheckpointType::Automobile => "automobile",
            CheckpointType::Rail => "rail",
            CheckpointType::Air => "air",
            CheckpointType::Sea => "sea",
            CheckpointType::River => "river",
            CheckpointType::Pedestrian => "pedestrian",
            CheckpointType::Other => "other",
        }
    }
}

impl fmt::Display for CheckpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operating status of a border crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    Active,
    Restricted,
    TemporarilyClosed,
    Closed,
    Unknown,
}

impl CheckpointStatus {
    pub const ALL: [CheckpointStatus; 5] = [
        CheckpointStatus::Active,
        CheckpointStatus::Restricted,
        CheckpointStatus::TemporarilyClosed,
        CheckpointStatus::Closed,
        CheckpointStatus::Unknown,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CheckpointStatus::Active => "Действует",
            CheckpointStatus::Restricted => "Ограничен",
            CheckpointStatus::TemporarilyClosed => "Временно закрыт",
            CheckpointStatus::Closed => "Закрыт",
            CheckpointStatus::Unknown => "Неизвестно",
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            CheckpointStatus::Active => "active",
            CheckpointStatus::Restricted => "restricted",
            CheckpointStatus::TemporarilyClosed => "temporarily_closed",
            CheckpointStatus::Closed => "closed",
            CheckpointStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a category name matches neither a key nor a label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownCategory {
    pub kind: &'static str,
    pub value: String,
}

/// Accepts the machine key (`rail`), the variant name in any case
/// (`Rail`, `TemporarilyClosed`) or the Russian label.
fn parse_category<T: Copy>(
    kind: &'static str,
    s: &str,
    all: &[T],
    key: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Result<T, UnknownCategory> {
    let needle = s.trim();
    let folded = needle.to_lowercase();
    let compact = folded.replace(['_', '-', ' '], "");
    all.iter()
        .copied()
        .find(|&c| {
            key(c) == folded
                || key(c).replace('_', "") == compact
                || label(c).to_lowercase() == folded
        })
        .ok_or_else(|| UnknownCategory {
            kind,
            value: needle.to_string(),
        })
}

impl FromStr for CheckpointType {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(
            "checkpoint type",
            s,
            &CheckpointType::ALL,
            CheckpointType::key,
            CheckpointType::label,
        )
    }
}

impl FromStr for CheckpointStatus {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(
            "checkpoint status",
            s,
            &CheckpointStatus::ALL,
            CheckpointStatus::key,
            CheckpointStatus::label,
        )
    }
}

/// WGS84 point, longitude first as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    /// Returns `None` unless both values are finite and inside the WGS84 range.
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Option<Self> {
        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);
        valid.then_some(Self { lon, lat })
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// One border-crossing facility after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkpoint {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub checkpoint_type: CheckpointType,
    pub status: CheckpointStatus,
    pub subject: String,
    pub country: String,
    pub coordinates: LngLat,
    #[serde(skip)]
    search_text: String,
}

impl Checkpoint {
    #[must_use]
    pub fn new(
        id: String,
        name: String,
        checkpoint_type: CheckpointType,
        status: CheckpointStatus,
        subject: String,
        country: String,
        coordinates: LngLat,
    ) -> Self {
        let search_text = [
            name.as_str(),
            subject.as_str(),
            country.as_str(),
            checkpoint_type.label(),
            status.label(),
        ]
        .iter()
        .map(|part| part.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(" • ");

        Self {
            id,
            name,
            checkpoint_type,
            status,
            subject,
            country,
            coordinates,
            search_text,
        }
    }

    /// Lower-cased haystack used by free-text search.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Case-insensitive substring test; `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty() || self.search_text.contains(needle)
    }
}
