//! Execution scopes and dispatch keys.
//!
//! A scope crosses two axes: granularity (segments vs hosts) and direction
//! (run on the targets themselves vs run on the master on their behalf), each
//! with or without the master itself. It decides which keys a command map gets
//! and how failures are phrased.

use serde::{Deserialize, Serialize};

/// Content id reserved for the coordinator (master)
pub const MASTER_CONTENT_ID: i32 = -1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    OnSegments,
    OnSegmentsAndMaster,
    OnHosts,
    OnHostsAndMaster,
    OnMasterToSegments,
    OnMasterToSegmentsAndMaster,
    OnMasterToHosts,
    OnMasterToHostsAndMaster,
}

impl Scope {
    pub const ALL: [Scope; 8] = [
        Scope::OnSegments,
        Scope::OnSegmentsAndMaster,
        Scope::OnHosts,
        Scope::OnHostsAndMaster,
        Scope::OnMasterToSegments,
        Scope::OnMasterToSegmentsAndMaster,
        Scope::OnMasterToHosts,
        Scope::OnMasterToHostsAndMaster,
    ];

    /// One dispatch entry per host rather than per segment
    pub fn is_per_host(self) -> bool {
        matches!(
            self,
            Scope::OnHosts
                | Scope::OnHostsAndMaster
                | Scope::OnMasterToHosts
                | Scope::OnMasterToHostsAndMaster
        )
    }

    /// Commands run on the master on behalf of each target (scp-style)
    pub fn is_from_master(self) -> bool {
        matches!(
            self,
            Scope::OnMasterToSegments
                | Scope::OnMasterToSegmentsAndMaster
                | Scope::OnMasterToHosts
                | Scope::OnMasterToHostsAndMaster
        )
    }

    pub fn includes_master(self) -> bool {
        matches!(
            self,
            Scope::OnSegmentsAndMaster
                | Scope::OnHostsAndMaster
                | Scope::OnMasterToSegmentsAndMaster
                | Scope::OnMasterToHostsAndMaster
        )
    }

    /// "segment", "segments", "host" or "hosts" depending on granularity and count
    pub fn unit_noun(self, count: usize) -> &'static str {
        match (self.is_per_host(), count == 1) {
            (true, true) => "host",
            (true, false) => "hosts",
            (false, true) => "segment",
            (false, false) => "segments",
        }
    }
}

/// What an integer dispatch key stands for.
///
/// Command maps and outputs are keyed by plain `i32`: `-1` is the master, any
/// other value is a content id. In per-host scopes that content id is only the
/// representative of its host, so the same integer can mean "segment 3" in one
/// map and "the host segment 3 lives on" in another. Decode with the scope the
/// map was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKey {
    Coordinator,
    Segment(i32),
    Host(i32),
}

impl DispatchKey {
    pub fn decode(key: i32, scope: Scope) -> Self {
        if key == MASTER_CONTENT_ID {
            DispatchKey::Coordinator
        } else if scope.is_per_host() {
            DispatchKey::Host(key)
        } else {
            DispatchKey::Segment(key)
        }
    }

    pub fn content_id(self) -> i32 {
        match self {
            DispatchKey::Coordinator => MASTER_CONTENT_ID,
            DispatchKey::Segment(id) | DispatchKey::Host(id) => id,
        }
    }
}
