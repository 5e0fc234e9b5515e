//! The region record
//!
//! A region is one contiguous area of a map: its centroid, its pixel
//! count and whatever extra attributes callers attach to it (a display
//! name, an owner, ...). Extra attributes are opaque to the engine and are
//! kept verbatim through serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute consulted for a region's display label.
pub const NAME_ATTRIBUTE: &str = "name";

/// One segmented region of a map.
///
/// Persisted as `{"center": [x, y], "weight": n, ...extra}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Centroid of the region's pixels, `(x, y)`
    pub center: (f64, f64),
    /// Number of pixels in the region
    pub weight: u32,
    /// Extra named attributes, stored beside `center` and `weight`
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Region {
    /// Create a region with no extra attributes
    pub fn new(center: (f64, f64), weight: u32) -> Self {
        Self {
            center,
            weight,
            data: Map::new(),
        }
    }

    /// Build a region from its member pixels.
    ///
    /// Returns `None` for an empty pixel set.
    pub fn from_points(points: &[(u32, u32)]) -> Option<Self> {
        center_of(points).map(|center| Self::new(center, points.len() as u32))
    }

    /// Attach an extra attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// The `name` attribute, if it is a string
    pub fn name(&self) -> Option<&str> {
        self.data.get(NAME_ATTRIBUTE).and_then(Value::as_str)
    }

    /// Display label: the `name` attribute, or the region key.
    pub fn label(&self, key: u32) -> String {
        self.name()
            .map(str::to_owned)
            .unwrap_or_else(|| key.to_string())
    }
}

/// Arithmetic mean of a set of points.
pub fn center_of(points: &[(u32, u32)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let (sx, sy) = points
        .iter()
        .fold((0u64, 0u64), |(sx, sy), &(x, y)| (sx + x as u64, sy + y as u64));
    let n = points.len() as f64;
    Some((sx as f64 / n, sy as f64 / n))
}

/// Weight-proportional average of centers.
///
/// Each center counts as many times as its weight. Returns `None` when the
/// total weight is zero.
pub fn weighted_center<'a, I>(regions: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a Region>,
{
    let (mut sx, mut sy, mut total) = (0.0, 0.0, 0u64);
    for r in regions {
        sx += r.center.0 * r.weight as f64;
        sy += r.center.1 * r.weight as f64;
        total += r.weight as u64;
    }
    if total == 0 {
        return None;
    }
    Some((sx / total as f64, sy / total as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_center_of() {
        assert_eq!(center_of(&[]), None);
        assert_eq!(center_of(&[(0, 0), (2, 4), (4, 2)]), Some((2.0, 2.0)));
    }

    #[test]
    fn test_weighted_center() {
        let a = Region::new((0.0, 0.0), 3);
        let b = Region::new((4.0, 8.0), 1);
        assert_eq!(weighted_center([&a, &b]), Some((1.0, 2.0)));
        let z = Region::new((5.0, 5.0), 0);
        assert_eq!(weighted_center([&z]), None);
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let r = Region::new((1.0, 1.0), 1);
        assert_eq!(r.label(7), "7");
        let r = r.with_attribute("name", "Alaska");
        assert_eq!(r.label(7), "Alaska");
        let r = Region::new((1.0, 1.0), 1).with_attribute("name", 12);
        assert_eq!(r.label(3), "3");
    }

    #[test]
    fn test_serde_flattens_extra_attributes() {
        let r = Region::new((1.5, 2.0), 10)
            .with_attribute("name", "Texas")
            .with_attribute("owner", json!({"id": 4}));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            json!({"center": [1.5, 2.0], "weight": 10, "name": "Texas", "owner": {"id": 4}})
        );
        let back: Region = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_deserialize_integer_center() {
        let r: Region = serde_json::from_value(json!({"center": [3, 4], "weight": 2})).unwrap();
        assert_eq!(r.center, (3.0, 4.0));
        assert!(r.data.is_empty());
    }
}
