//! Memory graph builder.
//!
//! Maintains the append-only shared-history graph: every notable event from
//! the other engines becomes a node, heuristically linked to its temporal
//! and categorical neighbors. The full `{nodes, connections}` document is
//! persisted after every mutation.

pub mod layout;
pub mod types;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::{Arc, Mutex};

use crate::storage::{Store, MEMORY_KEY};
use layout::Viewport;
use types::{MemoryCategory, MemoryEdge, MemoryGraph, MemoryNode, Position};

/// Maximum nodes retained; the oldest by insertion order is evicted first.
pub const NODE_CAP: usize = 100;

/// Strength of the link to the globally most recent node.
const RECENCY_STRENGTH: f64 = 0.8;
/// Strength of the link to the most recent node of the same category.
const CATEGORY_STRENGTH: f64 = 0.6;

pub struct MemoryGraphBuilder {
    graph: Mutex<MemoryGraph>,
    store: Arc<Store>,
}

impl MemoryGraphBuilder {
    /// Load the persisted graph, or start empty when absent or corrupt.
    pub fn load(store: Arc<Store>) -> Self {
        let graph: MemoryGraph = store.get_json(MEMORY_KEY).unwrap_or_default();
        Self {
            graph: Mutex::new(graph),
            store,
        }
    }

    /// Append a node and its heuristic edges; returns the new node's id.
    ///
    /// Unrecognized categories default to `conversation`. The node links to
    /// the most recently created node (any category) and, when one exists
    /// besides the two already connected, to the most recent node sharing
    /// its category.
    pub fn add_node(&self, category: &str, content: &str, timestamp: DateTime<Utc>) -> u64 {
        let category = MemoryCategory::parse_or_default(category);
        let mut guard = self.lock_graph();
        let graph = &mut *guard;

        let id = graph.nodes.iter().map(|n| n.id).max().map_or(1, |m| m + 1);

        let position = {
            let mut rng = rand::thread_rng();
            Position {
                x: rng.gen_range(0.3..0.7),
                y: rng.gen_range(0.3..0.7),
            }
        };

        let most_recent_id = graph
            .nodes
            .iter()
            .max_by_key(|n| n.timestamp)
            .map(|n| n.id);
        if let Some(most_recent_id) = most_recent_id {
            graph.edges.push(MemoryEdge {
                source: most_recent_id,
                target: id,
                strength: RECENCY_STRENGTH,
            });

            let related_id = graph
                .nodes
                .iter()
                .filter(|n| n.id != most_recent_id && n.category == category)
                .max_by_key(|n| n.timestamp)
                .map(|n| n.id);
            if let Some(related_id) = related_id {
                graph.edges.push(MemoryEdge {
                    source: related_id,
                    target: id,
                    strength: CATEGORY_STRENGTH,
                });
            }
        }

        graph.nodes.push(MemoryNode {
            id,
            category,
            content: content.to_string(),
            timestamp,
            position,
            weight: 1.0,
        });

        while graph.nodes.len() > NODE_CAP {
            let evicted = graph.nodes.remove(0);
            // Dangling edges are pruned with their endpoint.
            graph
                .edges
                .retain(|e| e.source != evicted.id && e.target != evicted.id);
            tracing::debug!(id = evicted.id, "evicted oldest memory node");
        }

        self.persist(graph);
        id
    }

    /// Snapshot of the current graph.
    pub fn graph(&self) -> MemoryGraph {
        self.lock_graph().clone()
    }

    /// Render the current graph for the given viewport.
    pub fn render_svg(&self, viewport: Viewport) -> String {
        layout::render_svg(&self.lock_graph(), viewport)
    }

    /// Install the demonstration graph if nothing has been recorded yet.
    pub fn seed_sample(&self) {
        {
            let graph = self.lock_graph();
            if !graph.nodes.is_empty() {
                return;
            }
        }

        let now = Utc::now();
        let entries: [(MemoryCategory, &str, i64, Position, f64); 6] = [
            (
                MemoryCategory::Conversation,
                "First conversation together",
                7,
                Position { x: 0.3, y: 0.2 },
                1.0,
            ),
            (
                MemoryCategory::Emotion,
                "Feeling curious about the potential of AI companions",
                6,
                Position { x: 0.4, y: 0.3 },
                0.8,
            ),
            (
                MemoryCategory::Ritual,
                "Completed Morning Reflection ritual",
                5,
                Position { x: 0.6, y: 0.4 },
                1.2,
            ),
            (
                MemoryCategory::Insight,
                "Realized the importance of daily mindfulness practice",
                3,
                Position { x: 0.5, y: 0.6 },
                1.1,
            ),
            (
                MemoryCategory::Conversation,
                "Discussed challenges with maintaining focus",
                2,
                Position { x: 0.7, y: 0.5 },
                0.9,
            ),
            (
                MemoryCategory::Ritual,
                "Completed Gratitude Practice ritual",
                1,
                Position { x: 0.6, y: 0.7 },
                1.0,
            ),
        ];

        let mut graph = self.lock_graph();
        for (i, (category, content, days_ago, position, weight)) in entries.iter().enumerate() {
            graph.nodes.push(MemoryNode {
                id: i as u64 + 1,
                category: *category,
                content: (*content).to_string(),
                timestamp: now - Duration::days(*days_ago),
                position: *position,
                weight: *weight,
            });
        }
        graph.edges = vec![
            MemoryEdge { source: 1, target: 2, strength: 0.7 },
            MemoryEdge { source: 1, target: 3, strength: 0.5 },
            MemoryEdge { source: 2, target: 3, strength: 0.6 },
            MemoryEdge { source: 3, target: 4, strength: 0.9 },
            MemoryEdge { source: 4, target: 5, strength: 0.8 },
            MemoryEdge { source: 5, target: 6, strength: 0.7 },
            MemoryEdge { source: 3, target: 6, strength: 0.6 },
        ];

        self.persist(&graph);
        tracing::info!("seeded demonstration memory graph");
    }

    fn persist(&self, graph: &MemoryGraph) {
        if let Err(e) = self.store.put_json(MEMORY_KEY, graph) {
            tracing::warn!(error = %e, "failed to persist memory graph");
        }
    }

    fn lock_graph(&self) -> std::sync::MutexGuard<'_, MemoryGraph> {
        self.graph.lock().unwrap_or_else(|e| e.into_inner())
    }
}
