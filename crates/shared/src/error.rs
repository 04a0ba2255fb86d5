//! Error types for loading and validating mesh data.

use thiserror::Error;

/// A mesh file parsed fine but its contents are inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    /// Zone has no nodes, so its centroid is undefined.
    #[error("zone '{zone}' has no nodes")]
    EmptyZone {
        /// The offending zone id.
        zone: String,
    },

    /// Zone references a node id that is not in the node table.
    #[error("zone '{zone}' references missing node '{node}'")]
    MissingNode {
        /// The zone that holds the reference.
        zone: String,
        /// The node id that could not be resolved.
        node: String,
    },

    /// Node position is NaN or infinite.
    #[error("node '{node}' has a non-finite position")]
    NonFinitePosition {
        /// The offending node id.
        node: String,
    },

    /// Bounding box is inverted or non-finite.
    #[error("invalid bounding box [{min0}, {max0}] x [{min1}, {max1}]")]
    InvalidBBox {
        min0: f64,
        max0: f64,
        min1: f64,
        max1: f64,
    },
}

/// A data source could not be turned into a mesh.
#[derive(Debug, Error)]
pub enum LoadError {
    /// `load_data` was called with an empty list.
    #[error("no data sources given")]
    NoSources,

    /// Meshes are loaded once per viewer instance.
    #[error("viewer is already {0}")]
    AlreadyStarted(&'static str),

    /// Transport failure (network error, non-2xx status, unreadable file).
    #[error("failed to fetch '{source_id}': {reason}")]
    Fetch { source_id: String, reason: String },

    /// The payload is not a valid mesh record.
    #[error("failed to parse '{source_id}': {source}")]
    Parse {
        source_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload parsed but failed validation.
    #[error("invalid mesh in '{source_id}': {source}")]
    Integrity {
        source_id: String,
        #[source]
        source: DataIntegrityError,
    },
}

impl LoadError {
    /// Identifier of the source that failed, if the error is tied to one.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            LoadError::NoSources | LoadError::AlreadyStarted(_) => None,
            LoadError::Fetch { source_id, .. }
            | LoadError::Parse { source_id, .. }
            | LoadError::Integrity { source_id, .. } => Some(source_id),
        }
    }
}

/// Viewer configuration rejected during validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("shrink factor {0} must lie in (0, 1]")]
    ShrinkFactor(f64),

    #[error("scale extent [{0}, {1}] must be positive and ordered")]
    ScaleExtent(f64, f64),

    #[error("palette must contain at least one colour")]
    EmptyPalette,
}

/// Result type for mesh loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataIntegrityError::MissingNode {
            zone: "4".into(),
            node: "17".into(),
        };
        assert_eq!(format!("{err}"), "zone '4' references missing node '17'");

        let err = LoadError::Fetch {
            source_id: "rank1.json".into(),
            reason: "404 Not Found".into(),
        };
        assert!(format!("{err}").contains("rank1.json"));
        assert_eq!(err.source_id(), Some("rank1.json"));
        assert_eq!(LoadError::NoSources.source_id(), None);
    }
}
