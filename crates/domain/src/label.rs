use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StrikeLabel {
    Top,
    Bottom,
}

impl StrikeLabel {
    /// Anchors are resolved in this order; a later anchor overwrites an
    /// earlier one that landed in the same cluster.
    pub const ANCHORS: [StrikeLabel; 2] = [StrikeLabel::Top, StrikeLabel::Bottom];

    /// Integer code reported to callers: 0 for top, 1 for bottom.
    pub fn code(self) -> u8 {
        match self {
            StrikeLabel::Top => 0,
            StrikeLabel::Bottom => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrikeLabel::Top => "top",
            StrikeLabel::Bottom => "bottom",
        }
    }
}

impl fmt::Display for StrikeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster id to label mapping built from the anchor recordings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterAssignment {
    labels: BTreeMap<usize, StrikeLabel>,
}

impl ClusterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `label` for `cluster`, returning the label it replaced.
    pub fn assign(&mut self, cluster: usize, label: StrikeLabel) -> Option<StrikeLabel> {
        self.labels.insert(cluster, label)
    }

    pub fn label_for(&self, cluster: usize) -> Option<StrikeLabel> {
        self.labels.get(&cluster).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
