//! Browser tests for the JavaScript-facing exports. Run with
//! `wasm-pack test --headless --firefox packages/topoviewer-core-wasm`.
#![cfg(target_arch = "wasm32")]

use topoviewer_core_wasm::{
    feature_display_name, feature_label_anchor, feature_label_position, label_font_size,
    point_in_polygon_js, point_to_boundary_distance_js, simplify_feature_collection, ViewerContext,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SQUARE: &str = r#"[[[0,0],[4,0],[4,4],[0,4],[0,0]],[[1,1],[3,1],[3,3],[1,3],[1,1]]]"#;

const FEATURE: &str = r#"{
    "type": "Feature",
    "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
            [[[10,10],[10,11],[11,11],[11,10],[10,10]]],
            [[[0,0],[0,2],[2,2],[2,0],[0,0]]]
        ]
    },
    "properties": { "S_NAME": "二丁目" }
}"#;

#[wasm_bindgen_test]
fn hole_is_excluded() {
    assert!(!point_in_polygon_js(2.0, 2.0, SQUARE).unwrap());
    assert!(point_in_polygon_js(0.5, 0.5, SQUARE).unwrap());
}

#[wasm_bindgen_test]
fn distance_reaches_nearest_ring() {
    let d = point_to_boundary_distance_js(0.5, 2.0, SQUARE).unwrap();
    assert!((d - 0.5).abs() < 1e-12);
}

#[wasm_bindgen_test]
fn multipolygon_label_lands_in_larger_part() {
    let label = feature_label_position(FEATURE).unwrap().unwrap();
    let (lat, lng) = (label[0], label[1]);
    assert!(lng > 0.0 && lng < 2.0 && lat > 0.0 && lat < 2.0);
    assert_eq!(feature_label_anchor(FEATURE).unwrap(), Some(label));
}

#[wasm_bindgen_test]
fn name_and_font_size() {
    assert_eq!(feature_display_name(FEATURE).unwrap(), "2丁目");
    assert_eq!(label_font_size(18.0), 17.0);
}

#[wasm_bindgen_test]
fn simplify_rejects_garbage() {
    assert!(simplify_feature_collection("not json", 1.0, true).is_err());
}

#[wasm_bindgen_test]
fn context_round_trip() {
    let mut ctx = ViewerContext::new("").unwrap();
    let first = ctx.label_anchor_js(FEATURE).unwrap();
    let second = ctx.label_anchor_js(FEATURE).unwrap();
    assert_eq!(first, second);
    assert_eq!(ctx.cache_stats().hits, 1);
}
