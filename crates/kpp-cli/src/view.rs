use std::io::Write;

use kpp_core::AppConfig;
use kpp_view::{build_list, compute_stats, compute_view, Selection, ViewQuery};

use crate::dataset;
use crate::terminal::{write_list, write_stats};

/// Filter the dataset once and print the result.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or output fails.
pub(crate) async fn run_view(config: &AppConfig, query: &ViewQuery, json: bool) -> anyhow::Result<()> {
    let fields = dataset::field_table(config)?;
    let dataset = dataset::load(config, fields).await?;
    let all = &dataset.checkpoints;

    let view = compute_view(all, query);
    let selection = Selection::new(config.selection_mode);
    let stats = compute_stats(all, &view, &selection);
    let list = build_list(all, &view, &selection, config.list_limit, config.list_layout);

    let mut out = std::io::stdout().lock();
    if json {
        let body = serde_json::json!({ "stats": stats, "list": list });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(());
    }

    if view.is_empty() {
        writeln!(out, "Ничего не найдено")?;
    } else {
        write_list(&mut out, &list)?;
    }
    writeln!(out)?;
    write_stats(&mut out, &stats)?;
    Ok(())
}
