//! Topology snapshots.
//!
//! The segment rows normally come from the catalog; this module only fixes
//! their shape and reads saved snapshots (YAML or JSON) from disk.

use crate::error::ClusterError;
use crate::topology::SegConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Catalog query whose result rows map onto [`SegmentRow`]
pub const SEGMENT_CONFIGURATION_QUERY: &str = "SELECT dbid, content AS content_id, port, hostname, datadir AS data_dir \
     FROM gp_segment_configuration WHERE role = 'p' ORDER BY content";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRow {
    #[serde(default)]
    pub dbid: i32,
    pub content_id: i32,
    #[serde(default)]
    pub port: u16,
    pub hostname: String,
    pub data_dir: String,
}

impl From<SegmentRow> for SegConfig {
    fn from(row: SegmentRow) -> Self {
        SegConfig {
            dbid: row.dbid,
            content_id: row.content_id,
            port: row.port,
            hostname: row.hostname,
            data_dir: row.data_dir,
        }
    }
}

/// Parse a snapshot; `.json` files are JSON, anything else YAML
pub fn parse_segments(text: &str, json: bool) -> Result<Vec<SegConfig>, ClusterError> {
    let rows: Vec<SegmentRow> = if json {
        serde_json::from_str(text)?
    } else if text.trim().is_empty() {
        Vec::new()
    } else {
        serde_yaml::from_str(text)?
    };
    Ok(rows.into_iter().map(SegConfig::from).collect())
}

pub async fn load_segments<P: AsRef<Path>>(path: P) -> Result<Vec<SegConfig>, ClusterError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).await?;
    let json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    let segments = parse_segments(&text, json)?;
    debug!("Loaded {} segment rows from {}", segments.len(), path.display());
    Ok(segments)
}
