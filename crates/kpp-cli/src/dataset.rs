//! Dataset loading shared by every subcommand, and the `check` handler.

use anyhow::Context;
use kpp_core::{AppConfig, FieldTable};
use kpp_data::{load_dataset, DataLoadError, DataSource, Dataset, LoadOptions};

/// Field table from `KPP_FIELDS_PATH`, or the built-in one.
pub(crate) fn field_table(config: &AppConfig) -> anyhow::Result<FieldTable> {
    match &config.fields_path {
        Some(path) => {
            let table = kpp_core::load_field_table(path)?;
            tracing::info!(path = %path.display(), "using field table override");
            Ok(table)
        }
        None => Ok(FieldTable::default()),
    }
}

/// Loads the configured dataset.
///
/// # Errors
///
/// Returns the underlying [`DataLoadError`] so callers can render it.
pub(crate) async fn load(config: &AppConfig, fields: FieldTable) -> Result<Dataset, DataLoadError> {
    let source: DataSource = config.data_source.parse()?;
    let options = LoadOptions::from_app_config(config, fields);
    load_dataset(&source, &options).await
}

/// Load the dataset and print a normalization report.
///
/// # Errors
///
/// Returns an error if the field table or the dataset cannot be loaded.
pub(crate) async fn run_check(config: &AppConfig) -> anyhow::Result<()> {
    let fields = field_table(config)?;
    let dataset = load(config, fields)
        .await
        .with_context(|| format!("loading {}", config.data_source))?;
    let report = dataset.report;

    println!("source:           {}", config.data_source);
    println!("features read:    {}", report.features_read);
    println!("checkpoints kept: {}", report.kept);
    println!("no geometry:      {}", report.dropped_geometry);
    println!("generated ids:    {}", report.synthesized_ids);
    println!("duplicate ids:    {}", report.duplicate_ids);
    println!(
        "updated at:       {}",
        crate::terminal::fmt_updated_at(dataset.updated_at)
    );

    let options = kpp_view::filter_options(&dataset.checkpoints);
    let types: Vec<&str> = options.types.iter().map(|t| t.label()).collect();
    let statuses: Vec<&str> = options.statuses.iter().map(|s| s.label()).collect();
    println!("types:            {}", types.join(", "));
    println!("statuses:         {}", statuses.join(", "));

    Ok(())
}
