// Utility functions to generate consistent cache keys across the application.
use crate::simplify::Simplifier;

/// Key for a feature's simplified geometry: "featureId@tolerance/strategy".
/// Tolerances that leave geometry untouched all share the "raw" key.
pub fn make_geometry_key(feature_id: &str, tolerance: f64, simplifier: Simplifier) -> String {
    if tolerance > 0.0 {
        let strategy = match simplifier {
            Simplifier::HighQuality => "hq",
            Simplifier::Fast => "fast",
        };
        format!("{}@{}/{}", feature_id, tolerance, strategy)
    } else {
        format!("{}@raw", feature_id)
    }
}

/// Key for a feature's label anchor.
pub fn make_label_key(feature_id: &str) -> String {
    format!("{}#label", feature_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_tolerances_share_a_key() {
        let a = make_geometry_key("f1", 0.0, Simplifier::HighQuality);
        let b = make_geometry_key("f1", -1.0, Simplifier::Fast);
        assert_eq!(a, b);
        assert_eq!(a, "f1@raw");
    }

    #[test]
    fn strategy_and_tolerance_are_part_of_the_key() {
        assert_eq!(make_geometry_key("f1", 0.5, Simplifier::HighQuality), "f1@0.5/hq");
        assert_ne!(
            make_geometry_key("f1", 0.5, Simplifier::HighQuality),
            make_geometry_key("f1", 0.5, Simplifier::Fast)
        );
        assert_ne!(make_label_key("f1"), make_geometry_key("f1", 0.0, Simplifier::Fast));
    }
}
