//! Tests for chart creation, replacement, theming and sparklines.
//!
//! Run with: cargo test --test chart_lifecycle_test

mod common;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use common::FakeBackend;
use mission_dashboard::charts::backend::{AxisConfig, Dataset, UpdateMode};
use mission_dashboard::charts::datasets::{extract_datasets, spectrum_datasets};
use mission_dashboard::charts::lifecycle::NO_DATA_MESSAGE;
use mission_dashboard::charts::specs::chart_specs;
use mission_dashboard::charts::theme::run_theme_watcher;
use mission_dashboard::charts::{ChartLifecycleManager, MiniTrendRenderer, RenderOutcome, ThemeBus};
use mission_dashboard::category::Category;

fn dataset(values: &[Option<f64>]) -> Dataset {
    Dataset {
        label: "Battery".to_string(),
        points: values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect(),
        color: None,
    }
}

fn manager() -> (ChartLifecycleManager, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::default());
    (ChartLifecycleManager::new(backend.clone()), backend)
}

#[test]
fn rendering_twice_leaves_one_live_chart() {
    let (charts, backend) = manager();

    let first = charts
        .render("powerChart", vec![dataset(&[Some(1.0)])], AxisConfig::default())
        .unwrap();
    let second = charts
        .render("powerChart", vec![dataset(&[Some(2.0)])], AxisConfig::default())
        .unwrap();

    let (RenderOutcome::Created(h1), RenderOutcome::Created(h2)) = (first, second) else {
        panic!("expected two charts");
    };
    assert_ne!(h1, h2);
    assert_eq!(backend.live_on("powerChart"), 1);
    assert_eq!(*backend.destroyed.lock(), vec![h1.0]);
    assert_eq!(charts.handle("powerChart"), Some(h2));
    assert_eq!(charts.live_count(), 1);
}

#[test]
fn empty_or_all_null_series_draw_placeholder() {
    let (charts, backend) = manager();

    let outcome = charts
        .render("ctdChart", Vec::new(), AxisConfig::default())
        .unwrap();
    assert_eq!(outcome, RenderOutcome::Placeholder);
    assert_eq!(charts.handle("ctdChart"), None);
    assert!(backend.created.lock().is_empty());

    let outcome = charts
        .render("ctdChart", vec![dataset(&[None, None])], AxisConfig::default())
        .unwrap();
    assert_eq!(outcome, RenderOutcome::Placeholder);
    assert_eq!(backend.placeholders_on("ctdChart"), 2);
    assert_eq!(backend.placeholders.lock()[0].1, NO_DATA_MESSAGE);
}

#[test]
fn no_data_render_destroys_previous_chart() {
    let (charts, backend) = manager();
    charts
        .render("waveHeightChart", vec![dataset(&[Some(1.2)])], AxisConfig::default())
        .unwrap();

    charts
        .render("waveHeightChart", vec![dataset(&[None])], AxisConfig::default())
        .unwrap();

    assert_eq!(backend.live_on("waveHeightChart"), 0);
    let record = charts.record("waveHeightChart").unwrap();
    assert_eq!(record.canvas_id, "waveHeightChart");
    assert!(record.handle.is_none());
}

#[test]
fn re_theme_updates_live_charts_in_place() {
    let (charts, backend) = manager();
    charts
        .render("powerChart", vec![dataset(&[Some(1.0)])], AxisConfig::default())
        .unwrap();
    charts
        .render("ctdChart", vec![dataset(&[Some(3.0)])], AxisConfig::default())
        .unwrap();
    charts.render_placeholder("weatherChart", "Data unavailable");

    let updated = charts.re_theme("#e9ecef", "rgba(255, 255, 255, 0.1)");

    assert_eq!(updated, 2);
    assert_eq!(backend.created.lock().len(), 2);
    assert!(backend.destroyed.lock().is_empty());
    let updates = backend.updates.lock();
    assert_eq!(updates.len(), 2);
    assert!(updates.iter().all(|(_, theme, mode)| {
        theme.text == "#e9ecef" && *mode == UpdateMode::None
    }));
}

#[test]
fn new_charts_pick_up_current_theme() {
    let (charts, backend) = manager();
    charts.re_theme("#ffffff", "#333333");

    charts
        .render("powerChart", vec![dataset(&[Some(1.0)])], AxisConfig::default())
        .unwrap();

    let created = backend.created_on("powerChart");
    assert_eq!(created[0].theme.text, "#ffffff");
    assert_eq!(created[0].theme.grid, "#333333");
}

#[test]
fn concurrent_renders_and_theme_changes_agree_on_colors() {
    let (charts, backend) = manager();
    let canvases = ["powerChart", "ctdChart", "weatherChart", "waveHeightChart"];

    std::thread::scope(|scope| {
        for canvas in canvases {
            let charts = &charts;
            scope.spawn(move || {
                for n in 0..200 {
                    charts
                        .render(canvas, vec![dataset(&[Some(n as f64)])], AxisConfig::default())
                        .unwrap();
                }
            });
        }
        for t in 0..2 {
            let charts = &charts;
            scope.spawn(move || {
                for n in 0..200 {
                    let color = format!("#{t}{n:05}");
                    charts.re_theme(&color, &color);
                }
            });
        }
    });

    let current = charts.theme();
    let live = backend.live_themes();
    assert_eq!(live.len(), canvases.len());
    for (handle, theme) in live {
        assert_eq!(theme, current, "chart {handle} drawn with stale colors");
    }
}

#[tokio::test(start_paused = true)]
async fn theme_watcher_debounces_to_latest_event() {
    let backend = Arc::new(FakeBackend::default());
    let charts = Arc::new(ChartLifecycleManager::new(backend.clone()));
    charts
        .render("powerChart", vec![dataset(&[Some(1.0)])], AxisConfig::default())
        .unwrap();

    let bus = ThemeBus::new();
    let watcher = tokio::spawn(run_theme_watcher(
        charts.clone(),
        bus.subscribe(),
        Duration::from_millis(50),
    ));

    bus.publish("#111111", "#222222");
    bus.publish("#eeeeee", "#dddddd");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(backend.updates.lock().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    let updates = backend.updates.lock().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1.text, "#eeeeee");
    assert_eq!(charts.theme().grid, "#dddddd");

    drop(bus);
    watcher.await.unwrap();
}

#[test]
fn datasets_follow_chart_spec_and_drop_empty_series() {
    let rows: Vec<_> = [
        json!({ "Timestamp": "2024-05-01T10:00:00Z", "BatteryWattHours": 2100.5, "PowerDraw": null }),
        json!({ "Timestamp": "2024-05-01T10:15:00", "BatteryWattHours": "2098.0", "PowerDraw": null }),
        json!({ "BatteryWattHours": 5.0 }),
    ]
    .into_iter()
    .map(|v| v.as_object().unwrap().clone())
    .collect();

    let spec = &chart_specs(Category::Power)[0];
    let datasets = extract_datasets(&rows, spec);

    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].label, "Battery (Wh)");
    assert_eq!(datasets[0].points.len(), 2);
    assert_eq!(datasets[0].points[1].1, Some(2098.0));
    assert!(datasets[0].points[0].0 < datasets[0].points[1].0);
}

#[test]
fn spectrum_payload_shapes() {
    let bare = json!([{ "freq": 0.05, "efth": 1.5 }, { "freq": 0.1, "efth": 0.7 }]);
    let wrapped = json!({ "data": [{ "frequency": 0.05, "energy_density": 2.0 }] });

    assert_eq!(spectrum_datasets(&bare)[0].points.len(), 2);
    assert_eq!(spectrum_datasets(&wrapped)[0].points, vec![(0.05, Some(2.0))]);
    assert!(spectrum_datasets(&json!({ "detail": "none" })).is_empty());
}

#[test]
fn mini_trends_render_from_embedded_json() {
    let backend = Arc::new(FakeBackend::default());
    let charts = Arc::new(ChartLifecycleManager::new(backend.clone()));
    let trends = MiniTrendRenderer::new(charts.clone());

    let embedded = r##"[
        {"canvas_id": "miniPower", "values": [1.0, 2.5, null, 3.0], "color": "#0d6efd"},
        {"canvas_id": "miniCtd", "values": [null, null]},
        {"canvas_id": "miniWaves"}
    ]"##;

    assert_eq!(trends.render_embedded(embedded).unwrap(), 1);
    assert!(charts.handle("miniPower").is_some());
    assert_eq!(backend.placeholders_on("miniCtd"), 1);
    assert_eq!(backend.placeholders_on("miniWaves"), 1);

    let config = &backend.created_on("miniPower")[0];
    assert!(!config.axis.show_axes);
    assert!(!config.axis.show_legend);

    assert!(trends.render_embedded("not json").is_err());
}
