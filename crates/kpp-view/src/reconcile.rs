//! Render reconciler.
//!
//! [`ViewController`] owns all view state and is the only thing that writes
//! to the map and the panel. Every state change ends in either a full
//! [`ViewController::reconcile`] or a targeted row/feature-state update.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kpp_core::{AppConfig, Checkpoint, CheckpointStatus, CheckpointType, ListLayout, LngLat, SelectionMode};
use kpp_data::{DataLoadError, Dataset};

use crate::filter::{compute_view, filter_options, CategoryFilter, ViewQuery};
use crate::list::build_list;
use crate::selection::{Selection, SelectionChange};
use crate::snapshot::{map_snapshot, MapFeatureCollection};
use crate::stats::{compute_stats, Stats};
use crate::style::{legend, LayerId, MapStyle};
use crate::surface::{MapSurface, Panel, PopupDetail};

pub const STATUS_PREPARING_MAP: &str = "Подготовка карты…";
pub const STATUS_READY: &str = "Карта готова";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub list_limit: usize,
    pub list_layout: ListLayout,
    pub selection_mode: SelectionMode,
    pub focus_min_zoom: f64,
    pub cluster_radius: u32,
    pub cluster_max_zoom: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            list_limit: 200,
            list_layout: ListLayout::Flat,
            selection_mode: SelectionMode::Multi,
            focus_min_zoom: 7.0,
            cluster_radius: 46,
            cluster_max_zoom: 9,
        }
    }
}

impl ViewSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            list_limit: config.list_limit,
            list_layout: config.list_layout,
            selection_mode: config.selection_mode,
            focus_min_zoom: config.focus_min_zoom,
            cluster_radius: config.cluster_radius,
            cluster_max_zoom: config.cluster_max_zoom,
        }
    }
}

/// Reports a failed load on the panel. There is no controller without data.
pub fn fail_load<P: Panel>(panel: &mut P, err: &DataLoadError) {
    tracing::error!(error = %err, "checkpoint dataset failed to load");
    panel.set_status(&format!("Ошибка загрузки данных: {err}"));
}

pub struct ViewController<M, P> {
    all: Arc<[Checkpoint]>,
    positions: HashMap<String, usize>,
    updated_at: Option<DateTime<Utc>>,
    settings: ViewSettings,
    style: MapStyle,
    query: ViewQuery,
    view: Vec<usize>,
    selection: Selection,
    heatmap_on: bool,
    map_installed: bool,
    map_push_pending: bool,
    pending_focus: Option<String>,
    map: M,
    panel: P,
}

impl<M: MapSurface, P: Panel> ViewController<M, P> {
    #[must_use]
    pub fn new(dataset: Dataset, settings: ViewSettings, map: M, panel: P) -> Self {
        let all: Arc<[Checkpoint]> = dataset.checkpoints.into();
        let positions = all
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let view = (0..all.len()).collect();

        Self {
            positions,
            updated_at: dataset.updated_at,
            style: MapStyle::new(settings.cluster_radius, settings.cluster_max_zoom),
            selection: Selection::new(settings.selection_mode),
            query: ViewQuery::default(),
            view,
            heatmap_on: false,
            map_installed: false,
            map_push_pending: false,
            pending_focus: None,
            settings,
            all,
            map,
            panel,
        }
    }

    /// First render: static panel furniture, then a full reconcile.
    pub fn start(&mut self) {
        self.panel.render_legend(&legend(&self.style));
        self.panel.render_filters(&filter_options(&self.all));
        self.panel.set_updated_at(self.updated_at);
        if !self.map.is_ready() {
            self.panel.set_status(STATUS_PREPARING_MAP);
        }
        self.reconcile();
    }

    /// Brings the panel and the map in line with the current view and
    /// selection.
    pub fn reconcile(&mut self) {
        let stats = self.stats();
        let list = build_list(
            &self.all,
            &self.view,
            &self.selection,
            self.settings.list_limit,
            self.settings.list_layout,
        );
        self.panel.render_stats(&stats);
        self.panel.render_list(&list);
        self.panel.set_empty_state(self.view.is_empty());

        self.push_to_map();
        tracing::debug!(
            shown = stats.shown,
            selected = stats.selected,
            list_rows = list.row_count(),
            "view reconciled"
        );
    }

    fn push_to_map(&mut self) {
        if self.map_installed {
            self.map.set_data(&self.snapshot());
        } else if self.map.is_ready() {
            self.install_map();
        } else {
            self.map_push_pending = true;
        }
    }

    fn install_map(&mut self) {
        let data = self.snapshot();
        self.map.install(&self.style, &data);
        self.map_installed = true;
        self.map_push_pending = false;

        for id in self.selection.iter() {
            self.map.set_feature_state(id, true);
        }
        if self.heatmap_on {
            self.apply_heatmap_visibility();
        }
        tracing::info!(features = data.len(), "map source installed");

        if let Some(id) = self.pending_focus.take() {
            self.focus(&id);
        }
    }

    /// The map finished loading its style.
    pub fn on_map_ready(&mut self) {
        if self.map_installed {
            return;
        }
        self.install_map();
        self.panel.set_status(STATUS_READY);
    }

    /// The map did not become ready in time. The list keeps working.
    pub fn map_ready_timed_out(&mut self, waited: Duration) {
        tracing::warn!(waited_ms = waited.as_millis(), "map did not become ready");
        self.panel.set_status(&format!(
            "Карта не загрузилась за {} мс, список доступен",
            waited.as_millis()
        ));
    }

    pub fn apply_query(&mut self, query: ViewQuery) -> usize {
        self.query = query;
        self.view = compute_view(&self.all, &self.query);
        tracing::debug!(
            text = %self.query.text,
            type_filter = %self.query.type_filter,
            status_filter = %self.query.status_filter,
            shown = self.view.len(),
            "query applied"
        );
        self.reconcile();
        self.view.len()
    }

    pub fn set_text(&mut self, text: &str) -> usize {
        let query = ViewQuery {
            text: text.to_string(),
            ..self.query.clone()
        };
        self.apply_query(query)
    }

    pub fn set_type_filter(&mut self, filter: CategoryFilter<CheckpointType>) -> usize {
        let query = ViewQuery {
            type_filter: filter,
            ..self.query.clone()
        };
        self.apply_query(query)
    }

    pub fn set_status_filter(&mut self, filter: CategoryFilter<CheckpointStatus>) -> usize {
        let query = ViewQuery {
            status_filter: filter,
            ..self.query.clone()
        };
        self.apply_query(query)
    }

    /// Flips the selection of `id`. Unknown ids are ignored.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.positions.contains_key(id) {
            tracing::debug!(id, "ignoring selection of unknown checkpoint");
            return false;
        }
        let change = self.selection.toggle(id);
        self.apply_selection_change(&change);
        true
    }

    /// Returns how many ids were deselected.
    pub fn clear_selection(&mut self) -> usize {
        let change = SelectionChange {
            selected: Vec::new(),
            deselected: self.selection.clear(),
        };
        self.apply_selection_change(&change);
        change.deselected.len()
    }

    fn apply_selection_change(&mut self, change: &SelectionChange) {
        for (id, selected) in change.iter() {
            if self.map_installed {
                self.map.set_feature_state(id, selected);
            }
            self.panel.update_row(id, selected);
        }
        let stats = self.stats();
        self.panel.render_stats(&stats);
    }

    /// Centers the map on a checkpoint in the current view and opens its
    /// popup. Returns `false` when the id is not in the view.
    ///
    /// Before the map is installed the latest target is remembered and
    /// focused on install, if it is still in the view then.
    pub fn focus(&mut self, id: &str) -> bool {
        let Some(checkpoint) = self.visible(id) else {
            tracing::debug!(id, "focus target not in view");
            return false;
        };
        if !self.map_installed {
            tracing::debug!(id, "map not installed, focus deferred");
            self.pending_focus = Some(id.to_string());
            return true;
        }

        let center = checkpoint.coordinates;
        let detail = PopupDetail::from(checkpoint);
        let zoom = self.map.zoom().max(self.settings.focus_min_zoom);
        self.map.ease_to(center, zoom);
        self.map.show_popup(center, &detail);
        true
    }

    #[must_use]
    pub fn pending_focus(&self) -> Option<&str> {
        self.pending_focus.as_deref()
    }

    /// A row in the side list was clicked.
    pub fn click_list_item(&mut self, id: &str) -> bool {
        if self.visible(id).is_none() {
            return false;
        }
        self.toggle_selection(id);
        self.focus(id)
    }

    /// A rendered point was clicked at `at`.
    pub fn click_map_point(&mut self, id: &str, at: LngLat) -> bool {
        if !self.toggle_selection(id) {
            return false;
        }
        if let Some(&i) = self.positions.get(id) {
            let detail = PopupDetail::from(&self.all[i]);
            self.map.show_popup(at, &detail);
        }
        true
    }

    /// Zooms into a cluster until it splits. No-op if the map cannot say.
    pub fn expand_cluster(&mut self, cluster_id: u64, center: LngLat) -> bool {
        match self.map.cluster_expansion_zoom(cluster_id) {
            Some(zoom) => {
                self.map.ease_to(center, zoom);
                true
            }
            None => {
                tracing::debug!(cluster_id, "no expansion zoom for cluster");
                false
            }
        }
    }

    /// Switches between the density heatmap and clustered points.
    pub fn toggle_heatmap(&mut self) -> bool {
        self.heatmap_on = !self.heatmap_on;
        if self.map_installed {
            self.apply_heatmap_visibility();
        }
        self.heatmap_on
    }

    fn apply_heatmap_visibility(&mut self) {
        for layer in LayerId::ALL {
            let visible = if layer == LayerId::Heatmap {
                self.heatmap_on
            } else {
                !self.heatmap_on
            };
            self.map.set_layer_visibility(layer, visible);
        }
    }

    fn visible(&self, id: &str) -> Option<&Checkpoint> {
        let &i = self.positions.get(id)?;
        self.view.binary_search(&i).ok()?;
        Some(&self.all[i])
    }

    fn snapshot(&self) -> MapFeatureCollection {
        map_snapshot(&self.all, &self.view)
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        compute_stats(&self.all, &self.view, &self.selection)
    }

    #[must_use]
    pub fn checkpoints(&self) -> &Arc<[Checkpoint]> {
        &self.all
    }

    /// Records in the current view, in canonical order.
    pub fn view(&self) -> impl Iterator<Item = &Checkpoint> {
        self.view.iter().map(|&i| &self.all[i])
    }

    #[must_use]
    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    #[must_use]
    pub fn heatmap_on(&self) -> bool {
        self.heatmap_on
    }

    #[must_use]
    pub fn is_map_installed(&self) -> bool {
        self.map_installed
    }

    #[must_use]
    pub fn is_map_push_pending(&self) -> bool {
        self.map_push_pending
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    #[must_use]
    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    #[must_use]
    pub fn into_parts(self) -> (M, P) {
        (self.map, self.panel)
    }
}
