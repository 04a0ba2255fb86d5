//! Mesh data files: the JSON wire records and the validated `Mesh`.
//!
//! A data file holds one rank of a partitioned 2D mesh:
//!
//! ```json
//! {
//!   "rank": 0,
//!   "nodes": { "0": { "pos": [0.0, 0.0] }, "1": { "pos": [1.0, 0.0] } },
//!   "zones": { "0": { "nids": [0, 1, 2] } },
//!   "bbox": { "min0": 0.0, "max0": 1.0, "min1": 0.0, "max1": 1.0 }
//! }
//! ```
//!
//! Records are parsed with serde and then validated into a [`Mesh`], which
//! resolves every node reference and computes zone centroids once.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use kurbo::{Point, Rect};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DataIntegrityError, LoadError, LoadResult};
use crate::geometry::centroid;

// ── Wire records ────────────────────────────────────────────────

/// Node or zone identifier as written in a data file.
///
/// JSON object keys are always strings while `nids` entries are usually
/// numbers; both normalise to the same string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct NodeKey(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for NodeKey {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(i) => NodeKey(i.to_string()),
            RawId::Str(s) => NodeKey(s),
        }
    }
}

impl From<NodeKey> for String {
    fn from(key: NodeKey) -> Self {
        key.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub pos: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub nids: Vec<NodeKey>,
}

/// Axis-aligned bounding box in world units (axis 0 = x, axis 1 = y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min0: f64,
    pub max0: f64,
    pub min1: f64,
    pub max1: f64,
}

impl BBox {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.min0, self.min1, self.max0, self.max1)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            min0: rect.x0,
            max0: rect.x1,
            min1: rect.y0,
            max1: rect.y1,
        }
    }

    fn validate(&self) -> Result<(), DataIntegrityError> {
        let finite = [self.min0, self.max0, self.min1, self.max1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min0 > self.max0 || self.min1 > self.max1 {
            return Err(DataIntegrityError::InvalidBBox {
                min0: self.min0,
                max0: self.max0,
                min1: self.min1,
                max1: self.max1,
            });
        }
        Ok(())
    }
}

/// One data file as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub rank: u32,
    pub nodes: HashMap<String, NodeRecord>,
    /// Zones in file order.
    #[serde(deserialize_with = "ordered_entries", serialize_with = "entries_as_map")]
    pub zones: Vec<(String, ZoneRecord)>,
    pub bbox: BBox,
}

/// Deserialize a JSON object into its entries, keeping file order.
///
/// A repeated key keeps its first position and takes the last value.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of zone records")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries: Vec<(String, T)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            let mut positions: HashMap<String, usize> = HashMap::new();
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                match positions.get(&key) {
                    Some(&i) => entries[i].1 = value,
                    None => {
                        positions.insert(key.clone(), entries.len());
                        entries.push((key, value));
                    }
                }
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

#[allow(clippy::ptr_arg)]
fn entries_as_map<S, T>(entries: &Vec<(String, T)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: Serialize,
{
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

/// Browser object-key order: integer-like keys ascending, then the rest in
/// insertion order.
fn iteration_order(entries: &mut [(String, ZoneRecord)]) {
    entries.sort_by_key(|(key, _)| match array_index(key) {
        Some(i) => (0, i),
        None => (1, 0),
    });
}

fn array_index(key: &str) -> Option<u64> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse::<u64>().ok()
}

// ── Validated mesh ──────────────────────────────────────────────

/// A polygonal zone with resolved node ids and its centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: String,
    nids: Vec<String>,
    centroid: Point,
}

impl Zone {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Boundary node ids in winding order.
    pub fn nids(&self) -> &[String] {
        &self.nids
    }

    /// Arithmetic mean of the raw node positions.
    pub fn centroid(&self) -> Point {
        self.centroid
    }
}

/// One rank of the mesh, validated and ready for geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    rank: u32,
    nodes: HashMap<String, Point>,
    zones: Vec<Zone>,
    zone_index: HashMap<String, usize>,
    bbox: BBox,
}

impl Mesh {
    /// Parse and validate a data file.
    pub fn from_json(source_id: &str, text: &str) -> LoadResult<Mesh> {
        let record: MeshRecord = serde_json::from_str(text).map_err(|source| LoadError::Parse {
            source_id: source_id.to_string(),
            source,
        })?;
        Mesh::from_record(record).map_err(|source| LoadError::Integrity {
            source_id: source_id.to_string(),
            source,
        })
    }

    /// Validate a parsed record: resolve node references, reject empty
    /// zones and non-finite data, compute centroids.
    pub fn from_record(record: MeshRecord) -> Result<Mesh, DataIntegrityError> {
        record.bbox.validate()?;

        let mut nodes = HashMap::with_capacity(record.nodes.len());
        for (id, node) in record.nodes {
            let [x, y] = node.pos;
            if !x.is_finite() || !y.is_finite() {
                return Err(DataIntegrityError::NonFinitePosition { node: id });
            }
            nodes.insert(id, Point::new(x, y));
        }

        let mut entries = record.zones;
        iteration_order(&mut entries);

        let mut zones = Vec::with_capacity(entries.len());
        let mut zone_index = HashMap::with_capacity(entries.len());
        for (id, zone) in entries {
            let mut positions = Vec::with_capacity(zone.nids.len());
            for nid in &zone.nids {
                let pos = nodes.get(&nid.0).ok_or_else(|| DataIntegrityError::MissingNode {
                    zone: id.clone(),
                    node: nid.0.clone(),
                })?;
                positions.push(*pos);
            }
            let centroid =
                centroid(&positions).ok_or_else(|| DataIntegrityError::EmptyZone { zone: id.clone() })?;

            zone_index.insert(id.clone(), zones.len());
            zones.push(Zone {
                id,
                nids: zone.nids.into_iter().map(String::from).collect(),
                centroid,
            });
        }

        tracing::debug!(
            rank = record.rank,
            nodes = nodes.len(),
            zones = zones.len(),
            "mesh validated"
        );

        Ok(Mesh {
            rank: record.rank,
            nodes,
            zones,
            zone_index,
            bbox: record.bbox,
        })
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Zones in rendering order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zone_index.get(id).map(|&i| &self.zones[i])
    }

    pub fn node(&self, id: &str) -> Option<Point> {
        self.nodes.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_parse_numeric_and_string_node_ids() {
        let json = r#"{
            "rank": 3,
            "nodes": { "0": {"pos": [0, 0]}, "1": {"pos": [2, 0]}, "2": {"pos": [0, 2]} },
            "zones": { "7": {"nids": [0, "1", 2]} },
            "bbox": {"min0": 0, "max0": 2, "min1": 0, "max1": 2}
        }"#;
        let mesh = Mesh::from_json("a.json", json).unwrap();
        assert_eq!(mesh.rank(), 3);
        assert_eq!(mesh.zones().len(), 1);
        assert_eq!(mesh.zone("7").unwrap().nids(), ["0", "1", "2"]);
    }

    #[test]
    fn test_centroid_is_mean_of_raw_nodes() {
        let mesh = fixtures::triangle_mesh(0, [[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]]);
        let zone = &mesh.zones()[0];
        assert_eq!(zone.centroid(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_zone_iteration_order() {
        let json = r#"{
            "rank": 0,
            "nodes": { "a": {"pos": [0, 0]} },
            "zones": {
                "b": {"nids": ["a"]},
                "10": {"nids": ["a"]},
                "a": {"nids": ["a"]},
                "2": {"nids": ["a"]}
            },
            "bbox": {"min0": 0, "max0": 0, "min1": 0, "max1": 0}
        }"#;
        let mesh = Mesh::from_json("order.json", json).unwrap();
        let ids: Vec<_> = mesh.zones().iter().map(Zone::id).collect();
        assert_eq!(ids, ["2", "10", "b", "a"]);
    }

    #[test]
    fn test_duplicate_zone_key_last_value_wins() {
        let json = r#"{
            "rank": 0,
            "nodes": { "0": {"pos": [0, 0]}, "1": {"pos": [1, 0]}, "2": {"pos": [0, 1]} },
            "zones": {
                "b": {"nids": [0]},
                "a": {"nids": [0, 1]},
                "b": {"nids": [0, 1, 2]}
            },
            "bbox": {"min0": 0, "max0": 1, "min1": 0, "max1": 1}
        }"#;
        let mesh = Mesh::from_json("dup.json", json).unwrap();
        let ids: Vec<_> = mesh.zones().iter().map(Zone::id).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(mesh.zone("b").unwrap().nids(), ["0", "1", "2"]);
    }

    #[test]
    fn test_missing_node_rejected() {
        let json = r#"{
            "rank": 0,
            "nodes": { "0": {"pos": [0, 0]} },
            "zones": { "5": {"nids": [0, 9]} },
            "bbox": {"min0": 0, "max0": 1, "min1": 0, "max1": 1}
        }"#;
        let err = Mesh::from_json("bad.json", json).unwrap_err();
        match err {
            LoadError::Integrity { source_id, source } => {
                assert_eq!(source_id, "bad.json");
                assert_eq!(
                    source,
                    DataIntegrityError::MissingNode {
                        zone: "5".into(),
                        node: "9".into()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_zone_rejected() {
        let json = r#"{
            "rank": 0,
            "nodes": {},
            "zones": { "1": {"nids": []} },
            "bbox": {"min0": 0, "max0": 1, "min1": 0, "max1": 1}
        }"#;
        let err = Mesh::from_json("empty.json", json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Integrity {
                source: DataIntegrityError::EmptyZone { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_inverted_bbox_rejected() {
        let json = r#"{
            "rank": 0, "nodes": {}, "zones": {},
            "bbox": {"min0": 2, "max0": 1, "min1": 0, "max1": 1}
        }"#;
        assert!(matches!(
            Mesh::from_json("bbox.json", json),
            Err(LoadError::Integrity {
                source: DataIntegrityError::InvalidBBox { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Mesh::from_json("x.json", "{\"rank\": -1}").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
