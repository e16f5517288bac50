// Display names and stable ids derived from feature properties.
//
// Each lookup is an ordered chain of accessors; the first one that yields a
// defined, non-empty value wins.
use serde_json::Value;
use uuid::Uuid;

use crate::models::Feature;

type Accessor = fn(&Feature) -> Option<String>;

const DEFAULT_NAME: &str = "Feature";

// Kanji numerals and their values. Values >= 10 act as multipliers.
const KANJI_DIGITS: [(char, u64); 15] = [
    ('零', 0),
    ('〇', 0),
    ('一', 1),
    ('壱', 1),
    ('二', 2),
    ('弐', 2),
    ('三', 3),
    ('参', 3),
    ('四', 4),
    ('五', 5),
    ('六', 6),
    ('七', 7),
    ('八', 8),
    ('九', 9),
    ('十', 10),
];

fn kanji_value(c: char) -> Option<u64> {
    KANJI_DIGITS.iter().find(|(k, _)| *k == c).map(|(_, v)| *v)
}

// Strings and numbers count as text; empty strings, null, bools and
// containers do not.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn prop(feature: &Feature, key: &str) -> Option<String> {
    feature.property(key).and_then(value_text)
}

fn first_of(feature: &Feature, chain: &[Accessor]) -> Option<String> {
    chain.iter().find_map(|accessor| accessor(feature))
}

const NAME_CHAIN: [Accessor; 3] = [
    |f| prop(f, "name"),
    |f| prop(f, "S_NAME"),
    |f| prop(f, "N03_004"),
];

const ID_CHAIN: [Accessor; 6] = [
    |f| f.id.as_ref().and_then(value_text),
    |f| prop(f, "id"),
    |f| prop(f, "ID"),
    |f| first_of(f, &NAME_CHAIN),
    |f| {
        let parts: Vec<String> = ["PREF_NAME", "CITY_NAME", "S_NAME"]
            .iter()
            .filter_map(|key| prop(f, key))
            .collect();
        (!parts.is_empty()).then(|| parts.join("_"))
    },
    // Always a single `[x, y]` position, whatever the geometry's nesting.
    // The viewer stringified `coordinates[0][0]`, which is a bare number for
    // a LineString and a whole ring for a MultiPolygon.
    |f| {
        let first = f.geometry.as_ref()?.first_position()?;
        serde_json::to_string(&first).ok()
    },
];

/// Replaces each run of kanji numerals with its Arabic value, e.g.
/// `"三丁目"` becomes `"3丁目"` and `"二十三"` becomes `"23"`.
pub fn convert_kanji_numerals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Option<(u64, u64)> = None; // (accumulated, pending digit)

    for c in text.chars() {
        match kanji_value(c) {
            Some(v) => {
                let (mut total, mut digit) = run.unwrap_or((0, 0));
                if v >= 10 {
                    total += digit.max(1) * v;
                    digit = 0;
                } else {
                    digit = v;
                }
                run = Some((total, digit));
            }
            None => {
                if let Some((total, digit)) = run.take() {
                    out.push_str(&(total + digit).to_string());
                }
                out.push(c);
            }
        }
    }
    if let Some((total, digit)) = run {
        out.push_str(&(total + digit).to_string());
    }

    out
}

/// Display name: `name`, then `S_NAME`, then `N03_004`, else `"Feature"`,
/// with kanji numerals converted.
pub fn feature_name(feature: &Feature) -> String {
    let name = first_of(feature, &NAME_CHAIN).unwrap_or_else(|| DEFAULT_NAME.to_string());
    convert_kanji_numerals(&name)
}

/// Identifier derived from the feature itself, `None` when nothing in the
/// feature can identify it.
pub fn stable_feature_id(feature: &Feature) -> Option<String> {
    first_of(feature, &ID_CHAIN)
}

/// Identifier used to track selections across reloads.
///
/// Tries the feature id, `id`, `ID`, the name chain, the present parts of
/// `PREF_NAME`/`CITY_NAME`/`S_NAME` joined by `_`, and the JSON of the first
/// coordinate. Falls back to a random `feature_{layer}_{uuid}`.
pub fn feature_id(feature: &Feature, layer_index: usize) -> String {
    stable_feature_id(feature)
        .unwrap_or_else(|| format!("feature_{}_{}", layer_index, Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Geometry, Position};
    use serde_json::{json, Map};

    fn feature_with(props: Value) -> Feature {
        let props: Map<String, Value> = serde_json::from_value(props).unwrap();
        Feature::new(Geometry::Point(Position::new(139.5, 35.25)), props)
    }

    #[test]
    fn kanji_runs_become_numbers() {
        assert_eq!(convert_kanji_numerals("三丁目"), "3丁目");
        assert_eq!(convert_kanji_numerals("二十三番地"), "23番地");
        assert_eq!(convert_kanji_numerals("十"), "10");
        assert_eq!(convert_kanji_numerals("十五"), "15");
        assert_eq!(convert_kanji_numerals("弐拾"), "2拾");
        assert_eq!(convert_kanji_numerals("本町一丁目二番"), "本町1丁目2番");
        assert_eq!(convert_kanji_numerals("Shibuya"), "Shibuya");
    }

    #[test]
    fn name_follows_priority_chain() {
        assert_eq!(feature_name(&feature_with(json!({ "name": "a", "S_NAME": "b" }))), "a");
        assert_eq!(feature_name(&feature_with(json!({ "name": "", "S_NAME": "b" }))), "b");
        assert_eq!(feature_name(&feature_with(json!({ "N03_004": "千代田区" }))), "千代田区");
        assert_eq!(feature_name(&feature_with(json!({ "S_NAME": "神田一丁目" }))), "神田1丁目");
        assert_eq!(feature_name(&feature_with(json!({}))), "Feature");
    }

    #[test]
    fn id_prefers_explicit_ids() {
        assert_eq!(feature_id(&feature_with(json!({ "id": 42, "name": "x" })), 0), "42");
        assert_eq!(feature_id(&feature_with(json!({ "ID": "abc" })), 0), "abc");

        let mut f = feature_with(json!({ "id": "prop" }));
        f.id = Some(json!("top"));
        assert_eq!(feature_id(&f, 0), "top");
    }

    #[test]
    fn id_joins_admin_names_then_uses_coordinates() {
        let f = feature_with(json!({ "PREF_NAME": "東京都", "CITY_NAME": "港区" }));
        assert_eq!(feature_id(&f, 0), "東京都_港区");

        let f = feature_with(json!({ "KEY_CODE": null }));
        assert_eq!(feature_id(&f, 0), "[139.5,35.25]");
    }

    #[test]
    fn coordinate_id_is_first_position_for_any_nesting() {
        let line = Feature::new(
            Geometry::LineString(vec![Position::new(1.0, 2.0), Position::new(3.0, 4.0)]),
            Map::new(),
        );
        assert_eq!(feature_id(&line, 0), "[1.0,2.0]");

        let multi = Feature::new(
            Geometry::MultiPolygon(vec![vec![crate::models::ring([
                (5.5, 6.5),
                (7.0, 6.5),
                (7.0, 8.0),
                (5.5, 6.5),
            ])]]),
            Map::new(),
        );
        assert_eq!(feature_id(&multi, 0), "[5.5,6.5]");
    }

    #[test]
    fn id_falls_back_to_generated() {
        let mut f = feature_with(json!({}));
        f.geometry = None;
        let a = feature_id(&f, 3);
        let b = feature_id(&f, 3);
        assert!(stable_feature_id(&f).is_none());
        assert!(a.starts_with("feature_3_"));
        assert_ne!(a, b);
    }
}
