use serde::{Deserialize, Serialize};

/// Entity a topology node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Event bus
    Bus,
    /// Rule
    Rule,
    /// Target
    Target,
}

/// Graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Globally unique id, namespaced by kind
    pub id: String,
    /// Entity kind
    pub kind: NodeKind,
    /// Display label
    pub label: String,
    /// Issues attached to this entity only
    pub issue_count: usize,
}

/// Directed edge from containing to contained entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
}

/// Bus → rule → target graph for visualization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    /// All nodes
    pub nodes: Vec<Node>,
    /// All edges
    pub links: Vec<Edge>,
}

impl TopologyGraph {
    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of edges leaving a node
    #[must_use]
    pub fn out_degree(&self, id: &str) -> usize {
        self.links.iter().filter(|e| e.source == id).count()
    }
}
