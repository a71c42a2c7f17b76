//! Layered layout for imported graphs.
//!
//! Positions are presentation only. The importer assigns each node a level by
//! breadth-first traversal from the trigger (a node sits one level below its
//! deepest parent), then spreads the nodes of a level horizontally around a
//! baseline. Nothing downstream may read positions back as execution order.

use ahash::AHashMap;
use std::collections::VecDeque;

use crate::graph::{Position, WorkflowGraph};

pub const BASE_X: f64 = 400.0;
pub const BASE_Y: f64 = 50.0;
pub const NODE_PITCH_X: f64 = 250.0;
pub const LEVEL_PITCH_Y: f64 = 150.0;

/// Assigns positions to every node of the graph. Nodes unreachable from the
/// trigger are placed on the row below the deepest reachable level.
pub fn assign_layout(graph: &mut WorkflowGraph) {
    let Some(trigger_id) = graph.trigger().map(|n| n.id.clone()) else {
        return;
    };

    let mut levels: AHashMap<String, usize> = AHashMap::new();
    levels.insert(trigger_id.clone(), 0);

    let mut queue = VecDeque::from([trigger_id]);
    // Relaxation budget guards against malformed cyclic input.
    let mut budget = graph.nodes.len().saturating_mul(graph.edges.len()) + 1;
    while let Some(node_id) = queue.pop_front() {
        if budget == 0 {
            break;
        }
        budget -= 1;
        let level = levels.get(&node_id).copied().unwrap_or(0);
        let targets: Vec<String> = graph
            .edges_from(&node_id)
            .map(|e| e.target.clone())
            .collect();
        for target in targets {
            let proposed = level + 1;
            let current = levels.get(&target).copied();
            if current.is_none_or(|c| proposed > c) {
                levels.insert(target.clone(), proposed);
                queue.push_back(target);
            }
        }
    }

    let max_level = levels.values().copied().max().unwrap_or(0);
    let orphan_level = max_level + 1;

    // Group nodes per level in graph order, then center each row.
    let mut rows: AHashMap<usize, Vec<String>> = AHashMap::new();
    for node in &graph.nodes {
        let level = levels.get(&node.id).copied().unwrap_or(orphan_level);
        rows.entry(level).or_default().push(node.id.clone());
    }

    for (level, row) in rows {
        let width = row.len() as f64;
        for (index, node_id) in row.into_iter().enumerate() {
            let offset = index as f64 - (width - 1.0) / 2.0;
            if let Some(node) = graph.node_mut(&node_id) {
                node.position = Position::new(
                    BASE_X + offset * NODE_PITCH_X,
                    BASE_Y + level as f64 * LEVEL_PITCH_Y,
                );
            }
        }
    }
}
