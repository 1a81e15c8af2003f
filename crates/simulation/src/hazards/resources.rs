use std::collections::HashSet;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::INITIAL_HAZARD_INTENSITY;
use crate::error::EvacError;
use crate::graph::{EvacuationGraph, NodeId};

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DisasterKind {
    #[default]
    Fire,
    Flood,
    Earthquake,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 3] = [
        DisasterKind::Fire,
        DisasterKind::Flood,
        DisasterKind::Earthquake,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DisasterKind::Fire => "Fire",
            DisasterKind::Flood => "Flood",
            DisasterKind::Earthquake => "Earthquake",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HazardId(pub u64);

impl fmt::Display for HazardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hazard-{}", self.0)
    }
}

/// A disaster effect anchored to one node. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    pub node: NodeId,
    pub kind: DisasterKind,
    /// In (0, 1]. 1.0 when placed by an operator, decays with each spread.
    pub intensity: f64,
    /// Simulation tick at which the hazard appeared.
    pub created_at: u64,
}

// =============================================================================
// Resource
// =============================================================================

/// Live hazards in creation order. At most one hazard per node.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HazardSet {
    hazards: Vec<Hazard>,
    occupied: HashSet<NodeId>,
    next_id: u64,
}

impl HazardSet {
    /// Place a fresh, full-intensity hazard on `node`.
    ///
    /// Duplicate placement is rejected, not stacked or overwritten.
    pub fn add(
        &mut self,
        graph: &EvacuationGraph,
        node: &NodeId,
        kind: DisasterKind,
        tick: u64,
    ) -> Result<Hazard, EvacError> {
        if !graph.contains(node) {
            return Err(EvacError::UnknownNode(node.clone()));
        }
        if self.contains(node) {
            return Err(EvacError::NodeAlreadyHazardous(node.clone()));
        }
        Ok(self
            .insert(node.clone(), kind, INITIAL_HAZARD_INTENSITY, tick)
            .clone())
    }

    /// Spread onto `node`. A no-op returning `None` when the node is
    /// already affected.
    pub(crate) fn spread_to(
        &mut self,
        node: &NodeId,
        kind: DisasterKind,
        intensity: f64,
        tick: u64,
    ) -> Option<HazardId> {
        if self.contains(node) {
            return None;
        }
        Some(self.insert(node.clone(), kind, intensity, tick).id)
    }

    fn insert(&mut self, node: NodeId, kind: DisasterKind, intensity: f64, tick: u64) -> &Hazard {
        let id = HazardId(self.next_id);
        self.next_id += 1;
        self.occupied.insert(node.clone());
        self.hazards.push(Hazard {
            id,
            node,
            kind,
            intensity,
            created_at: tick,
        });
        &self.hazards[self.hazards.len() - 1]
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.occupied.contains(node)
    }

    /// True if any of `nodes` currently hosts a hazard.
    pub fn contains_any<'a>(&self, nodes: impl IntoIterator<Item = &'a NodeId>) -> bool {
        nodes.into_iter().any(|n| self.contains(n))
    }

    pub fn get(&self, node: &NodeId) -> Option<&Hazard> {
        if !self.contains(node) {
            return None;
        }
        self.hazards.iter().find(|h| &h.node == node)
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// Owned copy of the hazard list, in creation order.
    pub fn snapshot(&self) -> Vec<Hazard> {
        self.hazards.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter()
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
