//! Line-driven interactive session over stdin.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use kpp_core::AppConfig;
use kpp_data::Dataset;
use kpp_view::{
    fail_load, forward_map_ready, CategoryFilter, Panel, Session, UiEvent, ViewController,
    ViewSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::dataset;
use crate::terminal::{HeadlessMap, TerminalPanel};

pub(crate) const HELP: &str = "\
команды:
  q <текст>        поиск (пустой текст сбрасывает)
  type <тип|all>   фильтр по типу
  status <ст|all>  фильтр по статусу
  select <id>      выбрать/снять и показать
  focus <id>       показать на карте
  clear            снять выделение
  heat             тепловая карта вкл/выкл
  quit             выход";

/// Parses one input line. `Ok(None)` means there is nothing to do.
pub(crate) fn parse_command(line: &str) -> Result<Option<UiEvent>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    let event = match verb {
        "q" => UiEvent::QueryInput(arg.to_string()),
        "type" => UiEvent::TypeFilter(parse_filter(arg)?),
        "status" => UiEvent::StatusFilter(parse_filter(arg)?),
        "select" if !arg.is_empty() => UiEvent::ListItemClicked(arg.to_string()),
        "focus" if !arg.is_empty() => UiEvent::Focus(arg.to_string()),
        "select" | "focus" => return Err(format!("{verb}: нужен id")),
        "clear" => UiEvent::ClearSelection,
        "heat" => UiEvent::ToggleHeatmap,
        "quit" | "exit" => UiEvent::Shutdown,
        other => return Err(format!("неизвестная команда: {other}")),
    };
    Ok(Some(event))
}

fn parse_filter<T>(arg: &str) -> Result<CategoryFilter<T>, String>
where
    T: std::str::FromStr<Err = kpp_core::UnknownCategory>,
{
    arg.parse().map_err(|e: kpp_core::UnknownCategory| e.to_string())
}

/// Loads the dataset, putting a failure on the panel status line before
/// returning it.
pub(crate) async fn load_or_report<W: Write>(
    config: &AppConfig,
    panel: &mut TerminalPanel<W>,
) -> anyhow::Result<Dataset> {
    let fields = dataset::field_table(config)?;
    match dataset::load(config, fields).await {
        Ok(dataset) => Ok(dataset),
        Err(err) => {
            fail_load(panel, &err);
            Err(err).with_context(|| format!("loading {}", config.data_source))
        }
    }
}

/// Run the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if the field table or the dataset cannot be loaded.
/// A dataset failure is also shown on the panel.
pub(crate) async fn run_browse(config: &AppConfig, map_delay: Duration) -> anyhow::Result<()> {
    let mut panel = TerminalPanel::new(std::io::stdout());
    let dataset = load_or_report(config, &mut panel).await?;

    let (ready_tx, ready_rx) = watch::channel(false);
    let map = HeadlessMap::new(ready_rx.clone());
    let mut controller =
        ViewController::new(dataset, ViewSettings::from_app_config(config), map, panel);
    controller.start();
    println!("{HELP}");

    let (events_tx, events_rx) = mpsc::channel(64);

    tokio::spawn(async move {
        tokio::time::sleep(map_delay).await;
        let _ = ready_tx.send(true);
    });
    let readiness = forward_map_ready(ready_rx, config.map_ready_timeout(), events_tx.clone());
    let input = tokio::spawn(read_commands(events_tx));

    let session = Session::new(controller, config.search_debounce());
    let mut controller = session.run(events_rx).await;
    readiness.abort();
    input.abort();

    let stats = controller.stats();
    let summary = format!(
        "сессия завершена: показано {} из {}, выбрано {}, на карте {} точек ({} выделено)",
        stats.shown,
        stats.total,
        stats.selected,
        controller.map().features(),
        controller.map().highlighted()
    );
    controller.panel_mut().set_status(&summary);
    Ok(())
}

async fn read_commands(events: mpsc::Sender<UiEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stdin");
                break;
            }
        };
        match parse_command(&line) {
            Ok(Some(UiEvent::Shutdown)) => break,
            Ok(Some(event)) => {
                if events.send(event).await.is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(message) => eprintln!("{message}\n{HELP}"),
        }
    }
    let _ = events.send(UiEvent::Shutdown).await;
}
