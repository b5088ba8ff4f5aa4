//! Declarative map styling.
//!
//! The map collaborator receives these tables once at install time and
//! evaluates them per feature. [`MapStyle::point_paint`] and
//! [`MapStyle::cluster_paint`] evaluate the same tables on this side so
//! headless renderers and tests see the same result.

use std::fmt;

use kpp_core::{CheckpointStatus, CheckpointType};
use serde::Serialize;

pub const SOURCE_ID: &str = "checkpoints";
pub const PROMOTE_ID: &str = "id";

pub const FALLBACK_COLOR: &str = "#64748b";
pub const FALLBACK_OPACITY: f64 = 0.6;

const TYPE_COLORS: [(CheckpointType, &str); 6] = [
    (CheckpointType::Automobile, "#3b82f6"),
    (CheckpointType::Rail, "#22c55e"),
    (CheckpointType::Air, "#a855f7"),
    (CheckpointType::Sea, "#0ea5e9"),
    (CheckpointType::River, "#14b8a6"),
    (CheckpointType::Pedestrian, "#f97316"),
];

const STATUS_OPACITY: [(CheckpointStatus, f64); 4] = [
    (CheckpointStatus::Active, 0.95),
    (CheckpointStatus::Restricted, 0.7),
    (CheckpointStatus::TemporarilyClosed, 0.45),
    (CheckpointStatus::Closed, 0.25),
];

/// Layers installed on the map, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerId {
    Clusters,
    ClusterCount,
    Points,
    Heatmap,
}

impl LayerId {
    pub const ALL: [LayerId; 4] = [
        LayerId::Clusters,
        LayerId::ClusterCount,
        LayerId::Points,
        LayerId::Heatmap,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::Clusters => "clusters",
            LayerId::ClusterCount => "cluster-count",
            LayerId::Points => "points",
            LayerId::Heatmap => "heatmap",
        }
    }

    /// Whether the layer is visible while the heatmap is off.
    #[must_use]
    pub fn visible_by_default(self) -> bool {
        self != LayerId::Heatmap
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `step` expression: `base` below the first threshold, then the value of
/// the highest threshold not exceeding the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Steps<T> {
    pub base: T,
    pub stops: Vec<(u64, T)>,
}

impl<T: Clone> Steps<T> {
    #[must_use]
    pub fn eval(&self, input: u64) -> T {
        self.stops
            .iter()
            .rev()
            .find(|(threshold, _)| input >= *threshold)
            .map_or_else(|| self.base.clone(), |(_, value)| value.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeColor {
    #[serde(rename = "type")]
    pub checkpoint_type: CheckpointType,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusOpacity {
    pub status: CheckpointStatus,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStyle {
    pub radius: u32,
    pub max_zoom: u32,
    pub color: Steps<&'static str>,
    pub circle_radius: Steps<f64>,
    pub stroke_color: &'static str,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointStyle {
    pub type_colors: Vec<TypeColor>,
    pub fallback_color: &'static str,
    pub status_opacity: Vec<StatusOpacity>,
    pub fallback_opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_width: f64,
    pub selected_stroke_color: &'static str,
    pub selected_stroke_width: f64,
    pub closed_stroke_color: &'static str,
    pub closed_stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapStyle {
    /// `(density, colour)` pairs for linear interpolation.
    pub ramp: Vec<(f64, &'static str)>,
    pub opacity: f64,
}

/// Everything the map needs to draw the checkpoint source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStyle {
    pub source_id: &'static str,
    pub promote_id: &'static str,
    pub layers: Vec<LayerId>,
    pub cluster: ClusterStyle,
    pub points: PointStyle,
    pub heatmap: HeatmapStyle,
}

/// Resolved paint for one rendered point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPaint {
    pub color: &'static str,
    pub opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_width: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self::new(46, 9)
    }
}

impl MapStyle {
    #[must_use]
    pub fn new(cluster_radius: u32, cluster_max_zoom: u32) -> Self {
        Self {
            source_id: SOURCE_ID,
            promote_id: PROMOTE_ID,
            layers: LayerId::ALL.to_vec(),
            cluster: ClusterStyle {
                radius: cluster_radius,
                max_zoom: cluster_max_zoom,
                color: Steps {
                    base: "rgba(59,130,246,.55)",
                    stops: vec![
                        (20, "rgba(34,197,94,.55)"),
                        (60, "rgba(250,204,21,.55)"),
                        (120, "rgba(239,68,68,.55)"),
                    ],
                },
                circle_radius: Steps {
                    base: 16.0,
                    stops: vec![(20, 20.0), (60, 26.0), (120, 32.0)],
                },
                stroke_color: "rgba(2,6,23,.85)",
                stroke_width: 2.0,
            },
            points: PointStyle {
                type_colors: TYPE_COLORS
                    .iter()
                    .map(|&(checkpoint_type, color)| TypeColor {
                        checkpoint_type,
                        color,
                    })
                    .collect(),
                fallback_color: FALLBACK_COLOR,
                status_opacity: STATUS_OPACITY
                    .iter()
                    .map(|&(status, opacity)| StatusOpacity { status, opacity })
                    .collect(),
                fallback_opacity: FALLBACK_OPACITY,
                stroke_color: "#020617",
                stroke_width: 1.0,
                selected_stroke_color: "#facc15",
                selected_stroke_width: 3.0,
                closed_stroke_color: "#ef4444",
                closed_stroke_width: 2.5,
            },
            heatmap: HeatmapStyle {
                ramp: vec![
                    (0.0, "rgba(0,0,0,0)"),
                    (0.25, "rgba(59,130,246,.85)"),
                    (0.45, "rgba(14,165,233,.90)"),
                    (0.65, "rgba(34,197,94,.95)"),
                    (0.82, "rgba(250,204,21,.95)"),
                    (1.0, "rgba(239,68,68,.98)"),
                ],
                opacity: 0.85,
            },
        }
    }

    #[must_use]
    pub fn type_color(&self, checkpoint_type: CheckpointType) -> &'static str {
        self.points
            .type_colors
            .iter()
            .find(|entry| entry.checkpoint_type == checkpoint_type)
            .map_or(self.points.fallback_color, |entry| entry.color)
    }

    #[must_use]
    pub fn status_opacity(&self, status: CheckpointStatus) -> f64 {
        self.points
            .status_opacity
            .iter()
            .find(|entry| entry.status == status)
            .map_or(self.points.fallback_opacity, |entry| entry.opacity)
    }

    /// Selection wins over the closed-status outline.
    #[must_use]
    pub fn point_paint(
        &self,
        checkpoint_type: CheckpointType,
        status: CheckpointStatus,
        selected: bool,
    ) -> PointPaint {
        let p = &self.points;
        let (stroke_color, stroke_width) = if selected {
            (p.selected_stroke_color, p.selected_stroke_width)
        } else if status == CheckpointStatus::Closed {
            (p.closed_stroke_color, p.closed_stroke_width)
        } else {
            (p.stroke_color, p.stroke_width)
        };
        PointPaint {
            color: self.type_color(checkpoint_type),
            opacity: self.status_opacity(status),
            stroke_color,
            stroke_width,
        }
    }

    /// Colour and circle radius for a cluster of `point_count` features.
    #[must_use]
    pub fn cluster_paint(&self, point_count: u64) -> (&'static str, f64) {
        (
            self.cluster.color.eval(point_count),
            self.cluster.circle_radius.eval(point_count),
        )
    }

    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: &'static str,
}

/// Map legend: every coloured type plus the fallback entry.
#[must_use]
pub fn legend(style: &MapStyle) -> Vec<LegendEntry> {
    style
        .points
        .type_colors
        .iter()
        .map(|entry| LegendEntry {
            label: entry.checkpoint_type.label(),
            color: entry.color,
        })
        .chain(std::iter::once(LegendEntry {
            label: CheckpointType::Other.label(),
            color: style.points.fallback_color,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_colors_follow_table_with_fallback() {
        let style = MapStyle::default();
        assert_eq!(style.type_color(CheckpointType::Rail), "#22c55e");
        assert_eq!(style.type_color(CheckpointType::Other), FALLBACK_COLOR);
    }

    #[test]
    fn status_opacity_has_default() {
        let style = MapStyle::default();
        assert!((style.status_opacity(CheckpointStatus::Closed) - 0.25).abs() < f64::EPSILON);
        assert!(
            (style.status_opacity(CheckpointStatus::Unknown) - FALLBACK_OPACITY).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn selected_outline_beats_closed_outline() {
        let style = MapStyle::default();
        let closed = style.point_paint(CheckpointType::Sea, CheckpointStatus::Closed, false);
        assert_eq!(closed.stroke_color, "#ef4444");
        assert!((closed.stroke_width - 2.5).abs() < f64::EPSILON);

        let selected = style.point_paint(CheckpointType::Sea, CheckpointStatus::Closed, true);
        assert_eq!(selected.stroke_color, "#facc15");
        assert!((selected.stroke_width - 3.0).abs() < f64::EPSILON);
        assert_eq!(selected.color, "#0ea5e9");
    }

    #[test]
    fn cluster_steps_pick_highest_reached_threshold() {
        let style = MapStyle::default();
        assert_eq!(style.cluster_paint(5), ("rgba(59,130,246,.55)", 16.0));
        assert_eq!(style.cluster_paint(20), ("rgba(34,197,94,.55)", 20.0));
        assert_eq!(style.cluster_paint(119), ("rgba(250,204,21,.55)", 26.0));
        assert_eq!(style.cluster_paint(500), ("rgba(239,68,68,.55)", 32.0));
    }

    #[test]
    fn json_carries_config_and_keys() {
        let json = MapStyle::new(50, 11).to_json().unwrap();
        assert_eq!(json["cluster"]["radius"], 50);
        assert_eq!(json["cluster"]["max_zoom"], 11);
        assert_eq!(json["promote_id"], "id");
        assert_eq!(json["points"]["type_colors"][1]["type"], "rail");
        assert_eq!(json["layers"][1], "cluster-count");
    }

    #[test]
    fn legend_ends_with_fallback() {
        let entries = legend(&MapStyle::default());
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].label, "Автомобильный");
        assert_eq!(entries[6].label, "Другое");
        assert_eq!(entries[6].color, FALLBACK_COLOR);
    }
}
