//! Text renderings of the panel and a headless stand-in for the map widget.

use std::collections::HashSet;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use kpp_core::LngLat;
use kpp_view::{
    FilterOptions, LayerId, LegendEntry, ListSnapshot, MapFeatureCollection, MapStyle,
    MapSurface, Panel, PopupDetail, Stats,
};
use tokio::sync::watch;

pub(crate) fn fmt_updated_at(updated_at: Option<DateTime<Utc>>) -> String {
    updated_at.map_or_else(|| "\u{2014}".to_string(), |ts| ts.format("%d.%m.%Y").to_string())
}

pub(crate) fn write_list(out: &mut impl Write, list: &ListSnapshot) -> io::Result<()> {
    for group in &list.groups {
        if let Some(heading) = &group.heading {
            writeln!(out, "== {heading} ==")?;
        }
        for row in &group.rows {
            let mark = if row.selected { "[x]" } else { "[ ]" };
            writeln!(
                out,
                "{mark} {:<28} {:<26} {:<16} {:<16} {}",
                row.name, row.subject, row.type_label, row.status_label, row.id
            )?;
        }
    }
    if list.hidden > 0 {
        writeln!(out, "... ещё {} (уточните запрос)", list.hidden)?;
    }
    Ok(())
}

pub(crate) fn write_stats(out: &mut impl Write, stats: &Stats) -> io::Result<()> {
    writeln!(
        out,
        "Всего: {} | Показано: {} | Выбрано: {} (в выборке {})",
        stats.total, stats.shown, stats.selected, stats.selected_shown
    )?;
    if !stats.top_regions.is_empty() {
        let regions: Vec<String> = stats
            .top_regions
            .iter()
            .map(|(subject, n)| format!("{subject} ({n})"))
            .collect();
        writeln!(out, "Топ регионов: {}", regions.join(", "))?;
    }
    Ok(())
}

/// Prints every panel update to a writer.
pub(crate) struct TerminalPanel<W> {
    out: W,
}

impl<W: Write> TerminalPanel<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, result: io::Result<()>) {
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write panel output");
        }
    }
}

impl<W: Write> Panel for TerminalPanel<W> {
    fn render_list(&mut self, list: &ListSnapshot) {
        let result = write_list(&mut self.out, list);
        self.emit(result);
    }

    fn update_row(&mut self, id: &str, selected: bool) {
        let verb = if selected { "выбран" } else { "снят" };
        let result = writeln!(self.out, "* {id}: {verb}");
        self.emit(result);
    }

    fn render_stats(&mut self, stats: &Stats) {
        let result = write_stats(&mut self.out, stats);
        self.emit(result);
    }

    fn set_empty_state(&mut self, visible: bool) {
        if visible {
            let result = writeln!(self.out, "Ничего не найдено");
            self.emit(result);
        }
    }

    fn set_status(&mut self, message: &str) {
        let result = writeln!(self.out, "[{message}]");
        self.emit(result);
    }

    fn render_filters(&mut self, options: &FilterOptions) {
        let types: Vec<&str> = options.types.iter().map(|t| t.label()).collect();
        let statuses: Vec<&str> = options.statuses.iter().map(|s| s.label()).collect();
        let result = writeln!(
            self.out,
            "Типы: {}\nСтатусы: {}",
            types.join(", "),
            statuses.join(", ")
        );
        self.emit(result);
    }

    fn render_legend(&mut self, legend: &[LegendEntry]) {
        let entries: Vec<String> = legend
            .iter()
            .map(|e| format!("{} {}", e.color, e.label))
            .collect();
        let result = writeln!(self.out, "Легенда: {}", entries.join(" | "));
        self.emit(result);
    }

    fn set_updated_at(&mut self, updated_at: Option<DateTime<Utc>>) {
        let result = writeln!(self.out, "Данные на {}", fmt_updated_at(updated_at));
        self.emit(result);
    }
}

/// Map stand-in that tracks camera, data and highlight state and logs it.
///
/// Readiness comes from a watch flag so the session can exercise the
/// deferred install path. It does not cluster, so cluster expansion is
/// always unavailable.
pub(crate) struct HeadlessMap {
    ready: watch::Receiver<bool>,
    zoom: f64,
    features: usize,
    highlighted: HashSet<String>,
}

impl HeadlessMap {
    pub(crate) fn new(ready: watch::Receiver<bool>) -> Self {
        Self {
            ready,
            zoom: 3.0,
            features: 0,
            highlighted: HashSet::new(),
        }
    }

    pub(crate) fn highlighted(&self) -> usize {
        self.highlighted.len()
    }

    pub(crate) fn features(&self) -> usize {
        self.features
    }
}

impl MapSurface for HeadlessMap {
    fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    fn install(&mut self, style: &MapStyle, data: &MapFeatureCollection) {
        self.features = data.len();
        let layers: Vec<&str> = style.layers.iter().map(|l| l.as_str()).collect();
        tracing::info!(
            source = style.source_id,
            features = self.features,
            cluster_radius = style.cluster.radius,
            layers = %layers.join(","),
            "map layers installed"
        );
    }

    fn set_data(&mut self, data: &MapFeatureCollection) {
        self.features = data.len();
        tracing::debug!(features = self.features, "map data replaced");
    }

    fn set_feature_state(&mut self, id: &str, selected: bool) {
        if selected {
            self.highlighted.insert(id.to_string());
        } else {
            self.highlighted.remove(id);
        }
    }

    fn set_layer_visibility(&mut self, layer: LayerId, visible: bool) {
        tracing::info!(%layer, visible, "layer visibility changed");
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.zoom = zoom;
        tracing::info!(lon = center.lon, lat = center.lat, zoom, "camera moved");
    }

    fn show_popup(&mut self, at: LngLat, detail: &PopupDetail) {
        println!(
            "--- {} ---\nТип: {}\nСтатус: {}\nСубъект РФ: {}\nСтрана: {}\nКоординаты: {:.4}, {:.4}",
            detail.name,
            detail.type_label,
            detail.status_label,
            detail.subject,
            detail.country,
            at.lat,
            at.lon
        );
    }

    fn cluster_expansion_zoom(&self, _cluster_id: u64) -> Option<f64> {
        None
    }
}
