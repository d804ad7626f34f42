use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::constants::OSM_WAY_TAGS;
use crate::utils::geometry::BoundingBox;

/// Top-level Overpass response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OsmElement>,
}

/// One OSM element (node or way) as returned by Overpass. Stored
/// opaquely: tags and node references are kept as-is, not validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsmElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<i64>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

impl OsmElement {
    pub fn is_way(&self) -> bool {
        self.kind == "way"
    }

    pub fn is_node(&self) -> bool {
        self.kind == "node"
    }

    /// Which of the retrieved way categories this element belongs to.
    pub fn way_kind(&self) -> Option<&str> {
        OSM_WAY_TAGS
            .iter()
            .find(|tag| self.tags.contains_key(**tag))
            .copied()
    }
}

/// Raw element list associated with one region's bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsmElementSet {
    pub region_code: String,
    pub bbox: BoundingBox,
    pub elements: Vec<OsmElement>,
}

impl OsmElementSet {
    pub fn new(region_code: String, bbox: BoundingBox, elements: Vec<OsmElement>) -> Self {
        Self {
            region_code,
            bbox,
            elements,
        }
    }

    pub fn way_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_way()).count()
    }

    pub fn node_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_node()).count()
    }

    /// Way counts per retrieved category (highway/railway/waterway).
    pub fn counts_by_kind(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for element in self.elements.iter().filter(|e| e.is_way()) {
            if let Some(kind) = element.way_kind() {
                *counts.entry(kind).or_insert(0) += 1;
            }
        }
        counts
    }
}
