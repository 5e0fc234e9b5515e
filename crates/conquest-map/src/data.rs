//! Persisted registry
//!
//! `data.json` holds the map name, the custom flag, `region_max` and every
//! region record keyed by its number. It is written with all object keys
//! sorted and four-space indentation so that it diffs cleanly.

use crate::error::MapResult;
use conquest_region::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Registry of one map as stored in `data.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Display name of the map
    pub name: Option<String>,
    /// Whether the map was derived from another one
    pub custom: Option<bool>,
    /// Highest region key currently assigned
    pub region_max: Option<u32>,
    /// Regions by key
    #[serde(default)]
    pub regions: BTreeMap<u32, Region>,
}

impl MapData {
    /// Read a registry file.
    ///
    /// A file without a `regions` entry loads with no regions.
    pub fn load(path: &Path) -> MapResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize with sorted keys and four-space indentation.
    pub fn to_json(&self) -> MapResult<Vec<u8>> {
        // Going through `Value` sorts every object's keys, including the
        // region keys, which sort as strings.
        let value = serde_json::to_value(self)?;
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Write the registry file, replacing any previous content.
    pub fn save(&self, path: &Path) -> MapResult<()> {
        let json = self.to_json()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Largest key present, if any
    pub fn max_key(&self) -> Option<u32> {
        self.regions.keys().next_back().copied()
    }

    /// Keys from `keys` that are not in the registry, in input order
    pub fn missing_keys(&self, keys: &[u32]) -> Vec<u32> {
        keys.iter()
            .copied()
            .filter(|k| !self.regions.contains_key(k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MapData {
        let mut regions = BTreeMap::new();
        regions.insert(2, Region::new((1.0, 2.5), 3));
        regions.insert(10, Region::new((4.0, 4.0), 1).with_attribute("name", "Ohio"));
        MapData {
            name: Some("usa".to_string()),
            custom: None,
            region_max: Some(10),
            regions,
        }
    }

    #[test]
    fn test_to_json_layout() {
        let text = String::from_utf8(sample().to_json().unwrap()).unwrap();
        let expected = r#"{
    "custom": null,
    "name": "usa",
    "region_max": 10,
    "regions": {
        "10": {
            "center": [
                4.0,
                4.0
            ],
            "name": "Ohio",
            "weight": 1
        },
        "2": {
            "center": [
                1.0,
                2.5
            ],
            "weight": 3
        }
    }
}"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_missing_fields_default() {
        let data: MapData = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(data.name.as_deref(), Some("x"));
        assert_eq!(data.custom, None);
        assert_eq!(data.region_max, None);
        assert!(data.regions.is_empty());
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let data = sample();
        data.save(&path).unwrap();
        assert_eq!(MapData::load(&path).unwrap(), data);
    }

    #[test]
    fn test_key_helpers() {
        let data = sample();
        assert_eq!(data.max_key(), Some(10));
        assert_eq!(data.missing_keys(&[2, 3, 10, 7]), vec![3, 7]);
        assert_eq!(MapData::default().max_key(), None);
    }
}
