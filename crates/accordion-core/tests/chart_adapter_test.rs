//! Integration tests for the store -> chart adapter path.

use accordion_core::chart::{ChartAdapter, ChartError, JsonChartRenderer};
use accordion_test_utils::{RecordingRenderer, date, full_page, homepage_takeover, store};

#[test]
fn chart_follows_every_generation() {
    let mut store = store();
    let mut adapter = ChartAdapter::new(RecordingRenderer::default());

    let a = store.add_asset(full_page());
    store.set_anchor_date(a, Some(date(2026, 10, 19)));
    adapter.sync(&store.generate_schedule().selected_assets).unwrap();

    let b = store.add_asset(homepage_takeover());
    store.set_anchor_date(b, Some(date(2026, 10, 26)));
    adapter.sync(&store.generate_schedule().selected_assets).unwrap();

    let renderer = adapter.renderer();
    assert_eq!(renderer.inits, 1);
    assert_eq!(renderer.loads.len(), 2);

    let last = renderer.last().unwrap();
    assert_eq!(last.project_nodes().count(), 2);
    assert_eq!(last.task_nodes().count(), 8);
    assert_eq!(last.links.len(), 6);
}

#[test]
fn removing_assets_shrinks_the_chart() {
    let mut store = store();
    let mut adapter = ChartAdapter::new(RecordingRenderer::default());

    let a = store.add_asset(full_page());
    store.set_anchor_date(a, Some(date(2026, 10, 19)));
    adapter.sync(&store.generate_schedule().selected_assets).unwrap();

    store.remove_asset(a);
    adapter.sync(&store.state().selected_assets).unwrap();

    let last = adapter.renderer().last().unwrap();
    assert!(last.data.is_empty());
    assert!(last.links.is_empty());
}

#[test]
fn renderer_failure_is_propagated() {
    let mut adapter = ChartAdapter::new(RecordingRenderer {
        fail_with: Some("component not mounted".to_owned()),
        ..RecordingRenderer::default()
    });
    let err = adapter.sync(&[]).unwrap_err();
    assert!(
        matches!(err, ChartError::Renderer(ref msg) if msg == "component not mounted"),
        "got: {err}"
    );
}

#[test]
fn json_renderer_emits_component_payload() {
    let mut store = store();
    let a = store.add_asset(full_page());
    store.set_anchor_date(a, Some(date(2026, 10, 19)));
    store.generate_schedule();

    let mut adapter = ChartAdapter::new(JsonChartRenderer::new(Vec::new()));
    adapter.sync(&store.state().selected_assets).unwrap();

    let out = adapter.into_renderer().into_inner();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["data"][0]["text"], "Full Page (Daily Mail)");
    assert_eq!(json["data"][1]["start_date"], "19-10-2026");
    assert_eq!(json["data"][4]["text"], "Publishing & Go-Live");
    assert_eq!(json["links"].as_array().unwrap().len(), 3);
}
