use wasm_bindgen::prelude::*;

// Create a console module for logging
pub mod console;
// GeoJSON data model
pub mod models;
// Boundary errors
pub mod error;
// Runtime configuration
pub mod config;
// Point-in-polygon and boundary distance
pub mod polygon_ops;
// Label placement
pub mod label_position;
// Ring simplification
pub mod simplify;
// Feature names and ids
pub mod feature_props;
mod cache_keys;
// Explicit per-viewer caches
pub mod viewer_context;

pub use config::{SimplifyOptions, ViewerConfig};
pub use error::ViewerError;
pub use feature_props::{convert_kanji_numerals, feature_id, feature_name, stable_feature_id};
pub use label_position::{
    font_size_for_zoom, label_anchor, label_position_for_feature, label_position_for_polygon,
};
pub use models::{Feature, FeatureCollection, Geometry, Position, Ring};
pub use polygon_ops::{point_in_polygon, point_to_boundary_distance};
pub use simplify::{simplify, simplify_with, DouglasPeucker, PolylineSimplifier, RadialThenDouglasPeucker, Simplifier};
pub use viewer_context::{CacheStats, ViewerContext};

use error::{decode, encode};

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("topoviewer core initialized");
    });
}

/// Simplifies a GeoJSON FeatureCollection given as text and returns the new
/// collection as text.
pub fn simplify_collection_json(collection_json: &str, options: SimplifyOptions) -> error::Result<String> {
    let collection: FeatureCollection = decode(collection_json, "feature collection")?;
    if !options.is_active() {
        return encode(&collection, "feature collection");
    }

    let simplified = simplify_with(&collection, options.tolerance, &options.simplifier());

    let before: usize = collection.features.iter().filter_map(|f| f.geometry.as_ref()).map(Geometry::point_count).sum();
    let after: usize = simplified.features.iter().filter_map(|f| f.geometry.as_ref()).map(Geometry::point_count).sum();
    console_log!(
        "Simplified {} features at tolerance {}: {} -> {} points",
        simplified.features.len(),
        options.tolerance,
        before,
        after
    );

    encode(&simplified, "simplified feature collection")
}

/// `[lat, lng]` label position for a GeoJSON Feature given as text.
pub fn label_position_json(feature_json: &str) -> error::Result<Option<[f64; 2]>> {
    let feature: Feature = decode(feature_json, "feature")?;
    Ok(label_position_for_feature(&feature).map(<[f64; 2]>::from))
}

/// `[lat, lng]` label anchor (label position or bounds centre).
pub fn label_anchor_json(feature_json: &str) -> error::Result<Option<[f64; 2]>> {
    let feature: Feature = decode(feature_json, "feature")?;
    Ok(label_anchor(&feature).map(<[f64; 2]>::from))
}

// Simplify a GeoJSON FeatureCollection; `high_quality = false` adds a radial
// distance pre-pass.
#[wasm_bindgen]
pub fn simplify_feature_collection(collection_json: &str, tolerance: f64, high_quality: bool) -> Result<String, JsValue> {
    let options = SimplifyOptions { tolerance, high_quality };
    Ok(simplify_collection_json(collection_json, options)?)
}

#[wasm_bindgen]
pub fn feature_label_position(feature_json: &str) -> Result<Option<Vec<f64>>, JsValue> {
    Ok(label_position_json(feature_json)?.map(|p| p.to_vec()))
}

#[wasm_bindgen]
pub fn feature_label_anchor(feature_json: &str) -> Result<Option<Vec<f64>>, JsValue> {
    Ok(label_anchor_json(feature_json)?.map(|p| p.to_vec()))
}

#[wasm_bindgen]
pub fn point_in_polygon_js(x: f64, y: f64, rings_json: &str) -> Result<bool, JsValue> {
    let rings: Vec<Ring> = decode(rings_json, "polygon rings")?;
    Ok(point_in_polygon(Position::new(x, y), &rings))
}

#[wasm_bindgen]
pub fn point_to_boundary_distance_js(x: f64, y: f64, rings_json: &str) -> Result<f64, JsValue> {
    let rings: Vec<Ring> = decode(rings_json, "polygon rings")?;
    Ok(point_to_boundary_distance(Position::new(x, y), &rings))
}

#[wasm_bindgen]
pub fn feature_display_name(feature_json: &str) -> Result<String, JsValue> {
    let feature: Feature = decode(feature_json, "feature")?;
    Ok(feature_name(&feature))
}

#[wasm_bindgen]
pub fn feature_stable_id(feature_json: &str, layer_index: usize) -> Result<String, JsValue> {
    let feature: Feature = decode(feature_json, "feature")?;
    Ok(feature_id(&feature, layer_index))
}

#[wasm_bindgen]
pub fn label_font_size(zoom: f64) -> f64 {
    font_size_for_zoom(zoom)
}
