use reqwest::Client;
use std::collections::HashSet;

use crate::config::CollectorSettings;
use crate::error::{CollectorError, Result};
use crate::models::{OsmElement, OsmElementSet, OverpassResponse, Region};
use crate::utils::constants::{OSM_WAY_TAGS, OVERPASS_TIMEOUT_SECS};
use crate::utils::geometry::BoundingBox;
use crate::utils::progress::ProgressReporter;

/// Per-region Overpass collector: one ways query per bounding box, then a
/// node-resolution pass batched to respect request-size limits. Unlike
/// the weather loop, any failed request aborts the whole run.
pub struct OsmFetcher {
    client: Client,
    endpoint: String,
    node_batch_size: usize,
}

impl OsmFetcher {
    pub fn new(settings: &CollectorSettings) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.overpass_endpoint.clone(),
            node_batch_size: settings.node_batch_size,
        }
    }

    /// Overpass-QL for ways tagged highway/railway/waterway in the box.
    pub fn ways_query(bbox: &BoundingBox) -> String {
        let bounds = bbox.to_overpass_string();
        let clauses: String = OSM_WAY_TAGS
            .iter()
            .map(|tag| format!("way[\"{}\"]({});", tag, bounds))
            .collect();

        format!(
            "[out:json][timeout:{}];({});out body;",
            OVERPASS_TIMEOUT_SECS, clauses
        )
    }

    /// Overpass-QL resolving one batch of node ids.
    pub fn nodes_query(ids: &[i64]) -> String {
        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "[out:json][timeout:{}];node(id:{});out body;",
            OVERPASS_TIMEOUT_SECS, id_list
        )
    }

    async fn execute(&self, query: &str) -> Result<Vec<OsmElement>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(CollectorError::Overpass {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<OverpassResponse>().await?.elements)
    }

    /// Fetch the element set for one region's bounding box.
    pub async fn fetch_region(&self, region: &Region) -> Result<OsmElementSet> {
        let bbox = region.bounding_box()?;

        let mut elements = self.execute(&Self::ways_query(&bbox)).await?;

        let node_ids = referenced_node_ids(&elements);
        for batch in node_ids.chunks(self.node_batch_size) {
            let nodes = self.execute(&Self::nodes_query(batch)).await?;
            elements.extend(nodes);
        }

        Ok(OsmElementSet::new(region.code().to_string(), bbox, elements))
    }

    /// Fetch all regions in sequence. The first failure propagates.
    pub async fn fetch_all(
        &self,
        regions: &[Region],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<OsmElementSet>> {
        let mut sets = Vec::with_capacity(regions.len());

        for region in regions {
            if let Some(p) = progress {
                p.set_message(&format!("Fetching OSM elements for {}", region.name()));
            }

            sets.push(self.fetch_region(region).await?);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        Ok(sets)
    }
}

/// Node ids referenced by way elements, de-duplicated in first-seen order.
pub fn referenced_node_ids(elements: &[OsmElement]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for element in elements.iter().filter(|e| e.is_way()) {
        for id in &element.nodes {
            if seen.insert(*id) {
                ids.push(*id);
            }
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn way(id: i64, nodes: Vec<i64>) -> OsmElement {
        OsmElement {
            kind: "way".to_string(),
            id,
            lat: None,
            lon: None,
            nodes,
            tags: HashMap::from([("highway".to_string(), "primary".to_string())]),
        }
    }

    #[test]
    fn test_ways_query_covers_all_tags() {
        let bbox = BoundingBox::new(15.0, 32.0, 16.0, 33.0).unwrap();
        let query = OsmFetcher::ways_query(&bbox);

        assert!(query.starts_with("[out:json]"));
        assert!(query.contains("way[\"highway\"]"));
        assert!(query.contains("way[\"railway\"]"));
        assert!(query.contains("way[\"waterway\"]"));
        assert!(query.contains("15.0000000,32.0000000,16.0000000,33.0000000"));
        assert!(query.ends_with("out body;"));
    }

    #[test]
    fn test_nodes_query_joins_ids() {
        let query = OsmFetcher::nodes_query(&[10, 20, 30]);
        assert!(query.contains("node(id:10,20,30);"));
    }

    #[test]
    fn test_referenced_node_ids_dedup_preserves_order() {
        let elements = vec![
            way(1, vec![5, 6, 7]),
            way(2, vec![7, 8, 5]),
            OsmElement {
                kind: "node".to_string(),
                id: 99,
                lat: Some(15.0),
                lon: Some(32.0),
                nodes: vec![],
                tags: HashMap::new(),
            },
        ];

        assert_eq!(referenced_node_ids(&elements), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_node_batching_respects_limit() {
        let ids: Vec<i64> = (0..120).collect();
        let batches: Vec<&[i64]> = ids.chunks(50).collect();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 50);
        assert_eq!(batches[2].len(), 20);
    }
}
