// Per-viewer memoisation of label anchors and simplified geometry.
//
// The viewer owns one `ViewerContext` and passes it wherever it needs
// geometry results; nothing here is global.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use crate::cache_keys::{make_geometry_key, make_label_key};
use crate::config::ViewerConfig;
use crate::console_log;
use crate::error::{decode, encode};
use crate::feature_props::stable_feature_id;
use crate::label_position::label_anchor;
use crate::models::{Feature, Position};
use crate::simplify::simplify_feature;

// Bounded map that evicts the least recently used entry when full
struct LruCache<T> {
    capacity: usize,
    tick: u64,
    data: HashMap<String, (T, u64)>, // value, last use
}

impl<T: Clone> LruCache<T> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            data: HashMap::new(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn get(&mut self, key: &str) -> Option<T> {
        let tick = self.next_tick();
        self.data.get_mut(key).map(|(value, last_use)| {
            *last_use = tick;
            value.clone()
        })
    }

    fn insert(&mut self, key: String, value: T) {
        if self.data.len() >= self.capacity && !self.data.contains_key(&key) {
            self.evict_oldest();
        }
        let tick = self.next_tick();
        self.data.insert(key, (value, tick));
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest_key) = self
            .data
            .iter()
            .min_by_key(|(_, (_, last_use))| *last_use)
            .map(|(k, _)| k.clone())
        {
            self.data.remove(&oldest_key);
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub labels_count: usize,
    pub geometries_count: usize,
    pub max_labels: usize,
    pub max_geometries: usize,
    pub hits: usize,
    pub misses: usize,
    pub total_requests: usize,
    pub hit_rate: f64,
}

#[wasm_bindgen]
pub struct ViewerContext {
    config: ViewerConfig,
    labels: LruCache<Option<Position>>,
    geometries: LruCache<Feature>,
    cache_hits: usize,
    cache_misses: usize,
}

impl ViewerContext {
    pub fn with_config(config: ViewerConfig) -> Self {
        ViewerContext {
            labels: LruCache::new(config.max_cached_labels),
            geometries: LruCache::new(config.max_cached_geometries),
            config,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn record(&mut self, hit: bool) {
        if hit {
            self.cache_hits += 1;
        } else {
            self.cache_misses += 1;
        }
    }

    /// Label anchor for a feature (`(lat, lon)`), memoised by feature id.
    /// Features with no stable id are computed every time.
    pub fn anchor_for(&mut self, feature: &Feature) -> Option<Position> {
        let Some(id) = stable_feature_id(feature) else {
            return label_anchor(feature);
        };

        let key = make_label_key(&id);
        if let Some(anchor) = self.labels.get(&key) {
            self.record(true);
            return anchor;
        }

        self.record(false);
        let anchor = label_anchor(feature);
        self.labels.insert(key, anchor);
        anchor
    }

    /// Feature simplified with the configured strategy, memoised by feature
    /// id and tolerance.
    pub fn simplified_feature(&mut self, feature: &Feature, tolerance: f64) -> Feature {
        let simplifier = self.config.simplifier;
        let Some(id) = stable_feature_id(feature) else {
            return simplify_feature(feature, tolerance, &simplifier);
        };

        let key = make_geometry_key(&id, tolerance, simplifier);
        if let Some(cached) = self.geometries.get(&key) {
            self.record(true);
            return cached;
        }

        self.record(false);
        let simplified = simplify_feature(feature, tolerance, &simplifier);
        self.geometries.insert(key, simplified.clone());
        simplified
    }

    pub fn cache_stats(&self) -> CacheStats {
        let total_requests = self.cache_hits + self.cache_misses;
        let hit_rate = if total_requests > 0 {
            self.cache_hits as f64 / total_requests as f64
        } else {
            0.0
        };

        CacheStats {
            labels_count: self.labels.len(),
            geometries_count: self.geometries.len(),
            max_labels: self.config.max_cached_labels,
            max_geometries: self.config.max_cached_geometries,
            hits: self.cache_hits,
            misses: self.cache_misses,
            total_requests,
            hit_rate,
        }
    }

    pub fn clear_caches(&mut self) {
        self.labels.clear();
        self.geometries.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self::with_config(ViewerConfig::default())
    }
}

#[wasm_bindgen]
impl ViewerContext {
    /// Creates a context from a JSON config object; pass an empty string for
    /// the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<ViewerContext, JsValue> {
        let config = ViewerConfig::from_json(config_json)?;
        console_log!(
            "Viewer context created (labels: {}, geometries: {})",
            config.max_cached_labels,
            config.max_cached_geometries
        );
        Ok(ViewerContext::with_config(config))
    }

    /// `[lat, lng]` for the feature's label, or `undefined`.
    #[wasm_bindgen(js_name = labelAnchor)]
    pub fn label_anchor_js(&mut self, feature_json: &str) -> Result<Option<Vec<f64>>, JsValue> {
        let feature: Feature = decode(feature_json, "feature")?;
        Ok(self.anchor_for(&feature).map(|p| vec![p.x, p.y]))
    }

    /// The feature as GeoJSON text with simplified geometry.
    #[wasm_bindgen(js_name = simplified)]
    pub fn simplified_js(&mut self, feature_json: &str, tolerance: f64) -> Result<String, JsValue> {
        let feature: Feature = decode(feature_json, "feature")?;
        let simplified = self.simplified_feature(&feature, tolerance);
        Ok(encode(&simplified, "simplified feature")?)
    }

    #[wasm_bindgen(js_name = clear)]
    pub fn clear_js(&mut self) {
        self.clear_caches();
        console_log!("Viewer context caches cleared");
    }

    #[wasm_bindgen(js_name = stats)]
    pub fn stats_js(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.cache_stats())?)
    }
}
