//! Collaborator seams: the map widget and the side panel.
//!
//! The controller only ever talks to these traits; the CLI supplies terminal
//! implementations and the tests supply recording fakes.

use chrono::{DateTime, Utc};
use kpp_core::{Checkpoint, LngLat};
use serde::Serialize;

use crate::filter::FilterOptions;
use crate::list::ListSnapshot;
use crate::snapshot::MapFeatureCollection;
use crate::stats::Stats;
use crate::style::{LayerId, LegendEntry, MapStyle};

/// Popup contents for one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupDetail {
    pub id: String,
    pub name: String,
    pub type_label: &'static str,
    pub status_label: &'static str,
    pub subject: String,
    pub country: String,
}

impl From<&Checkpoint> for PopupDetail {
    fn from(c: &Checkpoint) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            type_label: c.checkpoint_type.label(),
            status_label: c.status.label(),
            subject: c.subject.clone(),
            country: c.country.clone(),
        }
    }
}

pub trait MapSurface {
    /// True once the style has loaded and sources may be added.
    fn is_ready(&self) -> bool;

    /// Adds the source and layers. Called exactly once per controller.
    fn install(&mut self, style: &MapStyle, data: &MapFeatureCollection);

    /// Replaces the source data after installation.
    fn set_data(&mut self, data: &MapFeatureCollection);

    fn set_feature_state(&mut self, id: &str, selected: bool);

    fn set_layer_visibility(&mut self, layer: LayerId, visible: bool);

    fn zoom(&self) -> f64;

    fn ease_to(&mut self, center: LngLat, zoom: f64);

    fn show_popup(&mut self, at: LngLat, detail: &PopupDetail);

    /// Zoom at which `cluster_id` splits apart, if the map knows the cluster.
    fn cluster_expansion_zoom(&self, cluster_id: u64) -> Option<f64>;
}

pub trait Panel {
    fn render_list(&mut self, list: &ListSnapshot);

    /// Re-renders the highlight of a single row.
    fn update_row(&mut self, id: &str, selected: bool);

    fn render_stats(&mut self, stats: &Stats);

    fn set_empty_state(&mut self, visible: bool);

    fn set_status(&mut self, message: &str);

    fn render_filters(&mut self, _options: &FilterOptions) {}

    fn render_legend(&mut self, _legend: &[LegendEntry]) {}

    fn set_updated_at(&mut self, _updated_at: Option<DateTime<Utc>>) {}
}
