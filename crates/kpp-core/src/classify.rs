//! Free-text classification of checkpoint type and status.
//!
//! Source files describe categories in prose ("автомобильный грузопассажирский",
//! "временно не функционирует", "rail"). Both classifiers lower-case and trim
//! the input, then walk an ordered marker table; the first marker found as a
//! substring decides. Anything unmatched falls to the catch-all variant, so
//! classification never fails.

use crate::checkpoint::{CheckpointStatus, CheckpointType};

/// Ordered type markers. `воздуш`/`аэропорт` precede `sea` so that airport
/// descriptions mentioning a port are not read as sea crossings.
const TYPE_MARKERS: &[(&str, CheckpointType)] = &[
    ("авто", CheckpointType::Automobile),
    ("auto", CheckpointType::Automobile),
    ("желез", CheckpointType::Rail),
    ("ж/д", CheckpointType::Rail),
    ("rail", CheckpointType::Rail),
    ("воздуш", CheckpointType::Air),
    ("аэропорт", CheckpointType::Air),
    ("air", CheckpointType::Air),
    ("морск", CheckpointType::Sea),
    ("sea", CheckpointType::Sea),
    ("речн", CheckpointType::River),
    ("river", CheckpointType::River),
    ("пеш", CheckpointType::Pedestrian),
    ("pedestrian", CheckpointType::Pedestrian),
];

/// Ordered status markers. Temporary closures are matched first so that
/// "временно не функционирует" stays temporary; negated forms must come
/// before the bare `действ`/`active` markers they contain.
const STATUS_MARKERS: &[(&str, CheckpointStatus)] = &[
    ("врем", CheckpointStatus::TemporarilyClosed),
    ("приостанов", CheckpointStatus::TemporarilyClosed),
    ("suspend", CheckpointStatus::TemporarilyClosed),
    ("temporar", CheckpointStatus::TemporarilyClosed),
    ("не действ", CheckpointStatus::Closed),
    ("не функцион", CheckpointStatus::Closed),
    ("inactive", CheckpointStatus::Closed),
    ("действ", CheckpointStatus::Active),
    ("active", CheckpointStatus::Active),
    ("огран", CheckpointStatus::Restricted),
    ("restrict", CheckpointStatus::Restricted),
    ("сезон", CheckpointStatus::Restricted),
    ("seasonal", CheckpointStatus::Restricted),
    ("закры", CheckpointStatus::Closed),
    ("closed", CheckpointStatus::Closed),
];

fn first_marker<T: Copy>(raw: &str, markers: &[(&str, T)], fallback: T) -> T {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return fallback;
    }
    markers
        .iter()
        .find(|(marker, _)| value.contains(marker))
        .map_or(fallback, |&(_, category)| category)
}

/// Classify a free-text transport description.
#[must_use]
pub fn classify_type(raw: &str) -> CheckpointType {
    first_marker(raw, TYPE_MARKERS, CheckpointType::Other)
}

/// Classify a free-text status description.
#[must_use]
pub fn classify_status(raw: &str) -> CheckpointStatus {
    first_marker(raw, STATUS_MARKERS, CheckpointStatus::Unknown)
}
