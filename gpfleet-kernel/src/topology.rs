//! Segment topology of one cluster.
//!
//! Built once per invocation from a snapshot of segment rows and read-only
//! afterwards. Several segments may share a host; content ids are unique.

use crate::error::ClusterError;
use crate::scope::MASTER_CONTENT_ID;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

/// One database instance of the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegConfig {
    pub dbid: i32,
    pub content_id: i32,
    pub port: u16,
    pub hostname: String,
    pub data_dir: String,
}

impl SegConfig {
    pub fn is_master(&self) -> bool {
        self.content_id == MASTER_CONTENT_ID
    }
}

#[derive(Debug, Clone, Default)]
pub struct Topology {
    segments: HashMap<i32, SegConfig>,
}

impl Topology {
    /// Index segments by content id, rejecting duplicates
    pub fn new<I>(segments: I) -> Result<Self, ClusterError>
    where
        I: IntoIterator<Item = SegConfig>,
    {
        let mut by_content = HashMap::new();
        for seg in segments {
            match by_content.entry(seg.content_id) {
                Entry::Occupied(_) => return Err(ClusterError::DuplicateContent(seg.content_id)),
                Entry::Vacant(slot) => {
                    slot.insert(seg);
                }
            }
        }
        Ok(Self { segments: by_content })
    }

    /// All content ids, master included when present, in ascending order
    pub fn content_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.segments.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn segment_for(&self, content_id: i32) -> Result<&SegConfig, ClusterError> {
        self.segments
            .get(&content_id)
            .ok_or(ClusterError::ContentNotFound(content_id))
    }

    pub fn host_for(&self, content_id: i32) -> Result<&str, ClusterError> {
        self.segment_for(content_id).map(|seg| seg.hostname.as_str())
    }

    pub fn dbid_for(&self, content_id: i32) -> Result<i32, ClusterError> {
        self.segment_for(content_id).map(|seg| seg.dbid)
    }

    pub fn port_for(&self, content_id: i32) -> Result<u16, ClusterError> {
        self.segment_for(content_id).map(|seg| seg.port)
    }

    pub fn data_dir_for(&self, content_id: i32) -> Result<&str, ClusterError> {
        self.segment_for(content_id).map(|seg| seg.data_dir.as_str())
    }

    pub fn coordinator(&self) -> Option<&SegConfig> {
        self.segments.get(&MASTER_CONTENT_ID)
    }

    /// Distinct hostnames, sorted
    pub fn hostnames(&self) -> Vec<String> {
        self.segments
            .values()
            .map(|seg| seg.hostname.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn segments(&self) -> impl Iterator<Item = &SegConfig> {
        self.segments.values()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// One representative content id per distinct host.
    ///
    /// Among segments the lowest content id wins. When the master is included
    /// and shares its host with a segment, whichever of the two the map
    /// iteration reaches first is kept: callers get one entry for the host and
    /// must not rely on which key it is.
    pub fn representative_host_map(&self, include_master: bool) -> HashMap<String, i32> {
        let mut reps: HashMap<String, i32> = HashMap::new();
        for (&content_id, seg) in &self.segments {
            if content_id == MASTER_CONTENT_ID && !include_master {
                continue;
            }
            match reps.entry(seg.hostname.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(content_id);
                }
                Entry::Occupied(mut slot) => {
                    let current = *slot.get();
                    if current != MASTER_CONTENT_ID
                        && content_id != MASTER_CONTENT_ID
                        && content_id < current
                    {
                        slot.insert(content_id);
                    }
                }
            }
        }
        reps
    }
}
