//! Named preset tables for paths and colors.
//!
//! A [`PresetTable`] maps short names to either a polygon (a list of
//! `[x, y]` pairs) or a path-language string, and color names to hex
//! literals. Tables deserialize from JSON:
//!
//! ```
//! use stage_core::PresetTable;
//!
//! let table = PresetTable::from_json(r##"{
//!     "paths": { "wedge": [[0, 0], [10, 0], [0, 10]] },
//!     "colors": { "brand": "#3366ff" }
//! }"##).expect("valid table");
//! assert!(table.path("wedge").is_some());
//! assert_eq!(table.color("brand"), Some("#3366ff"));
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::StageResult;

/// A named path: either a polygon or a path-language string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathPreset {
    /// Closed polygon given as `[x, y]` points.
    Polygon(Vec<[f64; 2]>),
    /// Path mini-language source.
    Path(String),
}

/// Lookup table for named paths and colors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetTable {
    /// Named paths.
    #[serde(default)]
    pub paths: HashMap<String, PathPreset>,
    /// Named colors as hex literals.
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl PresetTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table shared by the whole process.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<PresetTable> = OnceLock::new();
        BUILTIN.get_or_init(Self::defaults)
    }

    /// Parse a table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a preset table.
    pub fn from_json(json: &str) -> StageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy every entry of `other` into this table, replacing same-named entries.
    pub fn merge(&mut self, other: &Self) {
        self.paths
            .extend(other.paths.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.colors
            .extend(other.colors.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Look up a named path.
    #[must_use]
    pub fn path(&self, name: &str) -> Option<&PathPreset> {
        self.paths.get(name)
    }

    /// Look up a named color's hex literal.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors
            .get(name)
            .or_else(|| self.colors.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    fn defaults() -> Self {
        let polygon = |pts: &[[f64; 2]]| PathPreset::Polygon(pts.to_vec());
        let paths = [
            ("rect", polygon(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])),
            (
                "square",
                polygon(&[[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]]),
            ),
            ("triangle", polygon(&[[0.0, -0.5], [0.5, 0.5], [-0.5, 0.5]])),
            (
                "diamond",
                polygon(&[[0.0, -0.5], [0.5, 0.0], [0.0, 0.5], [-0.5, 0.0]]),
            ),
            (
                "arrow",
                polygon(&[
                    [-0.5, -0.2],
                    [0.1, -0.2],
                    [0.1, -0.5],
                    [0.5, 0.0],
                    [0.1, 0.5],
                    [0.1, 0.2],
                    [-0.5, 0.2],
                ]),
            ),
            (
                "circle",
                PathPreset::Path("M 0.5 0 A 0.5 0.5 0 1 1 -0.5 0 A 0.5 0.5 0 1 1 0.5 0 Z".into()),
            ),
        ];
        let colors = [
            ("black", "#000000"),
            ("white", "#ffffff"),
            ("red", "#ff0000"),
            ("lime", "#00ff00"),
            ("green", "#008000"),
            ("blue", "#0000ff"),
            ("yellow", "#ffff00"),
            ("cyan", "#00ffff"),
            ("magenta", "#ff00ff"),
            ("orange", "#ffa500"),
            ("purple", "#800080"),
            ("gray", "#808080"),
            ("grey", "#808080"),
            ("silver", "#c0c0c0"),
            ("navy", "#000080"),
            ("teal", "#008080"),
            ("maroon", "#800000"),
            ("olive", "#808000"),
            ("transparent", "#00000000"),
        ];
        Self {
            paths: paths
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            colors: colors
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
