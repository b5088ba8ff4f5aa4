//! Recording fakes for the map and panel seams, plus fixture data.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kpp_core::LngLat;
use kpp_data::{normalize_default, Dataset};
use kpp_view::{
    FilterOptions, LayerId, LegendEntry, ListSnapshot, MapFeatureCollection, MapStyle,
    MapSurface, Panel, PopupDetail, Stats, ViewController, ViewSettings,
};
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct RecordingMap {
    pub ready: bool,
    pub installs: usize,
    pub installed_style: Option<Value>,
    /// Ids of the most recently installed or pushed data.
    pub data: Option<Vec<String>>,
    pub data_pushes: usize,
    pub feature_state: HashMap<String, bool>,
    pub feature_state_writes: Vec<(String, bool)>,
    pub layers: HashMap<LayerId, bool>,
    pub zoom: f64,
    pub camera: Option<(LngLat, f64)>,
    pub popups: Vec<(LngLat, PopupDetail)>,
    pub expansion_zoom: Option<f64>,
}

impl RecordingMap {
    pub fn ready() -> Self {
        Self {
            ready: true,
            zoom: 3.0,
            ..Self::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            zoom: 3.0,
            ..Self::default()
        }
    }

    pub fn highlighted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .feature_state
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl MapSurface for RecordingMap {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn install(&mut self, style: &MapStyle, data: &MapFeatureCollection) {
        self.installs += 1;
        self.installed_style = Some(style.to_json().expect("style serializes"));
        self.data = Some(data.ids().map(str::to_string).collect());
        for layer in LayerId::ALL {
            self.layers.insert(layer, layer.visible_by_default());
        }
    }

    fn set_data(&mut self, data: &MapFeatureCollection) {
        self.data_pushes += 1;
        self.data = Some(data.ids().map(str::to_string).collect());
    }

    fn set_feature_state(&mut self, id: &str, selected: bool) {
        self.feature_state.insert(id.to_string(), selected);
        self.feature_state_writes.push((id.to_string(), selected));
    }

    fn set_layer_visibility(&mut self, layer: LayerId, visible: bool) {
        self.layers.insert(layer, visible);
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.zoom = zoom;
        self.camera = Some((center, zoom));
    }

    fn show_popup(&mut self, at: LngLat, detail: &PopupDetail) {
        self.popups.push((at, detail.clone()));
    }

    fn cluster_expansion_zoom(&self, _cluster_id: u64) -> Option<f64> {
        self.expansion_zoom
    }
}

#[derive(Debug, Default)]
pub struct RecordingPanel {
    pub list: Option<ListSnapshot>,
    pub list_renders: usize,
    pub row_updates: Vec<(String, bool)>,
    pub stats: Option<Stats>,
    pub stats_renders: usize,
    pub empty_state: Option<bool>,
    pub statuses: Vec<String>,
    pub filters: Option<FilterOptions>,
    pub legend: Vec<LegendEntry>,
    pub updated_at: Option<Option<DateTime<Utc>>>,
}

impl RecordingPanel {
    pub fn listed_ids(&self) -> Vec<&str> {
        self.list
            .as_ref()
            .map(|l| l.rows().map(|r| r.id.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }
}

impl Panel for RecordingPanel {
    fn render_list(&mut self, list: &ListSnapshot) {
        self.list_renders += 1;
        self.list = Some(list.clone());
    }

    fn update_row(&mut self, id: &str, selected: bool) {
        self.row_updates.push((id.to_string(), selected));
    }

    fn render_stats(&mut self, stats: &Stats) {
        self.stats_renders += 1;
        self.stats = Some(stats.clone());
    }

    fn set_empty_state(&mut self, visible: bool) {
        self.empty_state = Some(visible);
    }

    fn set_status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn render_filters(&mut self, options: &FilterOptions) {
        self.filters = Some(options.clone());
    }

    fn render_legend(&mut self, legend: &[LegendEntry]) {
        self.legend = legend.to_vec();
    }

    fn set_updated_at(&mut self, updated_at: Option<DateTime<Utc>>) {
        self.updated_at = Some(updated_at);
    }
}

pub type Controller = ViewController<RecordingMap, RecordingPanel>;

pub fn feature(id: &str, name: &str, kind: &str, status: &str, subject: &str, lon: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, 55.0] },
        "properties": {
            "checkpoint_id": id,
            "checkpoint_name": name,
            "checkpoint_type": kind,
            "checkpoint_status": status,
            "subject_name": subject,
            "neighbor_country": "Финляндия"
        }
    })
}

pub fn dataset(features: Vec<Value>) -> Dataset {
    normalize_default(&json!({
        "type": "FeatureCollection",
        "metadata": { "updated_at": "2025-02-01" },
        "features": features
    }))
    .expect("fixture should normalize")
}

/// Five checkpoints across three transport types and three statuses.
pub fn border_dataset() -> Dataset {
    dataset(vec![
        feature("tor", "Торфяновка", "Автомобильный", "Действует", "Ленинградская область", 28.7),
        feature("bus", "Бусловская", "Железнодорожный", "Действует", "Ленинградская область", 28.8),
        feature("svt", "Светогорск", "Автомобильный", "Временно закрыт", "Ленинградская область", 28.9),
        feature("pog", "Пограничный", "Автомобильный", "Ограничен", "Приморский край", 131.4),
        feature("pul", "Пулково", "Воздушный", "Действует", "Санкт-Петербург", 30.3),
    ])
}

pub fn controller(dataset: Dataset, map: RecordingMap) -> Controller {
    controller_with(dataset, map, ViewSettings::default())
}

pub fn controller_with(dataset: Dataset, map: RecordingMap, settings: ViewSettings) -> Controller {
    let mut controller = ViewController::new(dataset, settings, map, RecordingPanel::default());
    controller.start();
    controller
}
