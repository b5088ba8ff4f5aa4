//! Event loop, debounced search and map readiness.

mod support;

use std::time::Duration;

use kpp_core::{CheckpointType, LngLat};
use kpp_view::{
    forward_map_ready, wait_for_map_ready, CategoryFilter, Session, UiEvent, ViewController,
    ViewError, ViewSettings,
};
use support::{border_dataset, RecordingMap, RecordingPanel};
use tokio::sync::{mpsc, watch};

fn session(map: RecordingMap) -> Session<RecordingMap, RecordingPanel> {
    let mut controller = ViewController::new(
        border_dataset(),
        ViewSettings::default(),
        map,
        RecordingPanel::default(),
    );
    controller.start();
    Session::new(controller, Duration::from_millis(120))
}

#[tokio::test(start_paused = true)]
async fn typing_burst_commits_only_final_text() {
    let (tx, rx) = mpsc::channel(16);
    let run = tokio::spawn(session(RecordingMap::ready()).run(rx));

    for text in ["п", "пу", "пул"] {
        tx.send(UiEvent::QueryInput(text.into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(UiEvent::Shutdown).await.unwrap();

    let controller = run.await.unwrap();
    assert_eq!(controller.query().text, "пул");
    assert_eq!(controller.panel().listed_ids(), vec!["pul"]);
    // Start plus exactly one debounced commit.
    assert_eq!(controller.map().data_pushes, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_applies_pending_query() {
    let (tx, rx) = mpsc::channel(16);
    let run = tokio::spawn(session(RecordingMap::ready()).run(rx));

    tx.send(UiEvent::QueryInput("пул".into())).await.unwrap();
    tx.send(UiEvent::QueryInput("пулково".into())).await.unwrap();
    tx.send(UiEvent::Shutdown).await.unwrap();

    let controller = run.await.unwrap();
    assert_eq!(controller.query().text, "пулково");
    assert_eq!(controller.view().count(), 1);
    // Only the last text is applied.
    assert_eq!(controller.map().data_pushes, 1);
}

#[tokio::test(start_paused = true)]
async fn closed_input_applies_pending_query() {
    let (tx, rx) = mpsc::channel(16);
    let run = tokio::spawn(session(RecordingMap::ready()).run(rx));

    tx.send(UiEvent::QueryInput("пулково".into())).await.unwrap();
    drop(tx);

    let controller = run.await.unwrap();
    assert_eq!(controller.panel().listed_ids(), vec!["pul"]);
}

#[tokio::test(start_paused = true)]
async fn committed_query_is_not_reapplied_on_shutdown() {
    let (tx, rx) = mpsc::channel(16);
    let run = tokio::spawn(session(RecordingMap::ready()).run(rx));

    tx.send(UiEvent::QueryInput("пулково".into())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(UiEvent::Shutdown).await.unwrap();

    let controller = run.await.unwrap();
    assert_eq!(controller.query().text, "пулково");
    assert_eq!(controller.map().data_pushes, 1);
}

#[tokio::test]
async fn discrete_events_apply_in_order() {
    let (tx, rx) = mpsc::channel(16);
    let run = tokio::spawn(session(RecordingMap::ready()).run(rx));

    tx.send(UiEvent::TypeFilter(CategoryFilter::Only(CheckpointType::Automobile)))
        .await
        .unwrap();
    tx.send(UiEvent::ListItemClicked("svt".into())).await.unwrap();
    tx.send(UiEvent::MapPointClicked {
        id: "tor".into(),
        at: LngLat::new(28.7, 55.0).unwrap(),
    })
    .await
    .unwrap();
    tx.send(UiEvent::ToggleHeatmap).await.unwrap();
    drop(tx);

    let controller = run.await.unwrap();
    assert_eq!(controller.view().count(), 3);
    assert!(controller.selection().contains("svt"));
    assert!(controller.selection().contains("tor"));
    assert!(controller.heatmap_on());
    assert_eq!(controller.map().popups.len(), 2);
}

#[tokio::test]
async fn clear_selection_event_empties_selection() {
    let (tx, rx) = mpsc::channel(16);
    let run = tokio::spawn(session(RecordingMap::ready()).run(rx));

    tx.send(UiEvent::ListItemClicked("bus".into())).await.unwrap();
    tx.send(UiEvent::ClearSelection).await.unwrap();
    drop(tx);

    let controller = run.await.unwrap();
    assert!(controller.selection().is_empty());
    assert!(controller.map().highlighted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn readiness_flag_installs_map_through_session() {
    let (tx, rx) = mpsc::channel(16);
    let (ready_tx, ready_rx) = watch::channel(false);
    let run = tokio::spawn(session(RecordingMap::loading()).run(rx));
    let forward = forward_map_ready(ready_rx, None, tx.clone());

    tokio::time::sleep(Duration::from_millis(500)).await;
    ready_tx.send(true).unwrap();
    forward.await.unwrap();
    tx.send(UiEvent::Shutdown).await.unwrap();

    let controller = run.await.unwrap();
    assert!(controller.is_map_installed());
    assert_eq!(controller.map().installs, 1);
}

#[tokio::test(start_paused = true)]
async fn readiness_timeout_reports_status() {
    let (tx, rx) = mpsc::channel(16);
    let (_ready_tx, ready_rx) = watch::channel(false);
    let run = tokio::spawn(session(RecordingMap::loading()).run(rx));
    let forward = forward_map_ready(ready_rx, Some(Duration::from_secs(2)), tx.clone());

    forward.await.unwrap();
    tx.send(UiEvent::Shutdown).await.unwrap();

    let controller = run.await.unwrap();
    assert!(!controller.is_map_installed());
    assert!(controller.panel().last_status().unwrap().contains("2000"));
}

#[tokio::test]
async fn wait_for_map_ready_returns_immediately_when_already_ready() {
    let (_tx, rx) = watch::channel(true);
    assert!(wait_for_map_ready(rx, Some(Duration::from_millis(10))).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn wait_for_map_ready_times_out() {
    let (_tx, rx) = watch::channel(false);
    let err = wait_for_map_ready(rx, Some(Duration::from_millis(250)))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::MapReadyTimeout { waited } if waited == Duration::from_millis(250)));
}

#[tokio::test]
async fn wait_for_map_ready_reports_dropped_sender() {
    let (tx, rx) = watch::channel(false);
    drop(tx);
    let err = wait_for_map_ready(rx, None).await.unwrap_err();
    assert!(matches!(err, ViewError::MapReadySignalClosed));
}
