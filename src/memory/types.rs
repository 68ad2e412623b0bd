//! Memory graph type definitions.
//!
//! Defines [`MemoryCategory`] (the four node categories), [`MemoryNode`],
//! [`MemoryEdge`], and the persisted [`MemoryGraph`] document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four categories a memory node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    /// Something said in conversation.
    Conversation,
    /// A completed guided practice.
    Ritual,
    /// A realization worth keeping.
    Insight,
    /// A named feeling.
    Emotion,
}

impl MemoryCategory {
    pub const ALL: [MemoryCategory; 4] = [
        Self::Conversation,
        Self::Ritual,
        Self::Insight,
        Self::Emotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Ritual => "ritual",
            Self::Insight => "insight",
            Self::Emotion => "emotion",
        }
    }

    /// Render color for nodes of this category.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Conversation => "#3498db",
            Self::Ritual => "#2ecc71",
            Self::Insight => "#9b59b6",
            Self::Emotion => "#e74c3c",
        }
    }

    /// Parse a category label, defaulting unrecognized input to
    /// [`MemoryCategory::Conversation`].
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or(Self::Conversation)
    }
}

impl std::fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversation" => Ok(Self::Conversation),
            "ritual" => Ok(Self::Ritual),
            "insight" => Ok(Self::Insight),
            "emotion" => Ok(Self::Emotion),
            _ => Err(format!("unknown memory category: {s}")),
        }
    }
}

/// Normalized render position in the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One entry in the shared-history graph. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Monotonically increasing, unique within the graph.
    pub id: u64,
    #[serde(rename = "type")]
    pub category: MemoryCategory,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Placeholder position; the renderer may refine it.
    pub position: Position,
    /// Relative visual weight (1.0 is standard).
    pub weight: f64,
}

/// An undirected annotated link between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryEdge {
    pub source: u64,
    pub target: u64,
    /// Link strength in `(0, 1]`.
    pub strength: f64,
}

/// The persisted memory document: `{nodes, connections}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryGraph {
    #[serde(default)]
    pub nodes: Vec<MemoryNode>,
    #[serde(default, rename = "connections")]
    pub edges: Vec<MemoryEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in MemoryCategory::ALL {
            assert_eq!(
                category.as_str().parse::<MemoryCategory>().unwrap(),
                category
            );
        }
    }

    #[test]
    fn unknown_category_defaults_to_conversation() {
        assert_eq!(
            MemoryCategory::parse_or_default("daydream"),
            MemoryCategory::Conversation
        );
        assert_eq!(
            MemoryCategory::parse_or_default("ritual"),
            MemoryCategory::Ritual
        );
    }

    #[test]
    fn graph_serializes_edges_as_connections() {
        let graph = MemoryGraph {
            nodes: vec![],
            edges: vec![MemoryEdge {
                source: 1,
                target: 2,
                strength: 0.8,
            }],
        };
        let json = serde_json::to_value(&graph).unwrap();
        assert!(json.get("connections").is_some());
        assert!(json.get("edges").is_none());
    }
}
