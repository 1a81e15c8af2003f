use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::EvacError;
use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::HazardSet;
use crate::pathfinding_sys::{plan_route, RoutePlan};
use crate::propagation::TickReport;

// =============================================================================
// Selection state machine
// =============================================================================

/// Operator's start/end selection. Driven only by node-selection events:
///
/// ```text
/// Empty --select--> StartOnly --select--> Complete --select--> StartOnly
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RouteQuery {
    #[default]
    Empty,
    StartOnly(NodeId),
    Complete { start: NodeId, end: NodeId },
}

impl RouteQuery {
    /// State after the operator selects `node`.
    pub fn select(&self, node: NodeId) -> RouteQuery {
        match self {
            RouteQuery::StartOnly(start) => RouteQuery::Complete {
                start: start.clone(),
                end: node,
            },
            RouteQuery::Empty | RouteQuery::Complete { .. } => RouteQuery::StartOnly(node),
        }
    }

    pub fn start(&self) -> Option<&NodeId> {
        match self {
            RouteQuery::Empty => None,
            RouteQuery::StartOnly(start) | RouteQuery::Complete { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<&NodeId> {
        match self {
            RouteQuery::Complete { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Both endpoints, when the query is complete.
    pub fn endpoints(&self) -> Option<(&NodeId, &NodeId)> {
        match self {
            RouteQuery::Complete { start, end } => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RouteQuery::Complete { .. })
    }
}

// =============================================================================
// Resource
// =============================================================================

/// The active query and the route currently shown for it.
///
/// The plan is only ever replaced wholesale, never edited in place.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    query: RouteQuery,
    plan: Option<RoutePlan>,
}

impl RouteState {
    pub fn query(&self) -> &RouteQuery {
        &self.query
    }

    pub fn plan(&self) -> Option<&RoutePlan> {
        self.plan.as_ref()
    }

    /// Current optimal path; empty without a complete query or a reachable end.
    pub fn path(&self) -> &[NodeId] {
        match &self.plan {
            Some(plan) => &plan.path,
            None => &[],
        }
    }

    /// Apply one node-selection event. Unknown ids leave the state untouched.
    pub fn select_node(
        &mut self,
        graph: &EvacuationGraph,
        hazards: &HazardSet,
        node: &NodeId,
    ) -> Result<&RouteQuery, EvacError> {
        if !graph.contains(node) {
            return Err(EvacError::UnknownNode(node.clone()));
        }
        self.query = self.query.select(node.clone());
        if self.query.is_complete() {
            self.recompute(graph, hazards);
        } else {
            self.plan = None;
        }
        Ok(&self.query)
    }

    /// Set both endpoints at once and compute the route.
    pub fn set_query(
        &mut self,
        graph: &EvacuationGraph,
        hazards: &HazardSet,
        start: &NodeId,
        end: &NodeId,
    ) -> Result<(), EvacError> {
        for id in [start, end] {
            if !graph.contains(id) {
                return Err(EvacError::UnknownNode(id.clone()));
            }
        }
        self.query = RouteQuery::Complete {
            start: start.clone(),
            end: end.clone(),
        };
        self.recompute(graph, hazards);
        Ok(())
    }

    /// Re-run the path engine for the active query. Returns true if the
    /// shown route changed.
    pub fn recompute(&mut self, graph: &EvacuationGraph, hazards: &HazardSet) -> bool {
        let next = self
            .query
            .endpoints()
            .and_then(|(start, end)| plan_route(graph, hazards, start, end));
        let changed = next != self.plan;
        self.plan = next;
        changed
    }

    /// True if the shown route passes through a hazardous node.
    pub fn crosses_hazard(&self, hazards: &HazardSet) -> bool {
        hazards.contains_any(self.path())
    }

    pub fn clear(&mut self) {
        self.query = RouteQuery::Empty;
        self.plan = None;
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Replaces the route when the tick that just ran invalidated it.
pub fn refresh_route(
    graph: Res<EvacuationGraph>,
    hazards: Res<HazardSet>,
    mut report: ResMut<TickReport>,
    mut route: ResMut<RouteState>,
) {
    if !report.path_invalidated || !route.query().is_complete() {
        return;
    }
    report.route_changed = route.recompute(&graph, &hazards);
    if report.route_changed {
        info!(
            "Route rerouted at tick {}: {:?}",
            report.tick,
            route.path().iter().map(NodeId::as_str).collect::<Vec<_>>()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazards::DisasterKind;
    use crate::test_harness::triangle_graph;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_query_transitions() {
        let q = RouteQuery::Empty;
        let q = q.select(id("A"));
        assert_eq!(q, RouteQuery::StartOnly(id("A")));
        let q = q.select(id("C"));
        assert_eq!(
            q,
            RouteQuery::Complete {
                start: id("A"),
                end: id("C")
            }
        );
        let q = q.select(id("B"));
        assert_eq!(q, RouteQuery::StartOnly(id("B")));
    }

    #[test]
    fn test_query_accessors() {
        let q = RouteQuery::Complete {
            start: id("A"),
            end: id("C"),
        };
        assert_eq!(q.start(), Some(&id("A")));
        assert_eq!(q.end(), Some(&id("C")));
        assert!(q.is_complete());
        assert_eq!(RouteQuery::StartOnly(id("A")).end(), None);
        assert_eq!(RouteQuery::Empty.start(), None);
    }

    #[test]
    fn test_select_node_computes_on_second_click() {
        let g = triangle_graph();
        let hz = HazardSet::default();
        let mut route = RouteState::default();

        route.select_node(&g, &hz, &id("A")).unwrap();
        assert!(route.path().is_empty());

        route.select_node(&g, &hz, &id("C")).unwrap();
        assert_eq!(route.path(), &[id("A"), id("B"), id("C")]);

        // Third click restarts from the clicked node and drops the path.
        let q = route.select_node(&g, &hz, &id("B")).unwrap().clone();
        assert_eq!(q, RouteQuery::StartOnly(id("B")));
        assert!(route.path().is_empty());
        assert!(route.plan().is_none());
    }

    #[test]
    fn test_select_unknown_node_is_noop() {
        let g = triangle_graph();
        let hz = HazardSet::default();
        let mut route = RouteState::default();
        route.select_node(&g, &hz, &id("A")).unwrap();
        let err = route.select_node(&g, &hz, &id("X")).unwrap_err();
        assert_eq!(err, EvacError::UnknownNode(id("X")));
        assert_eq!(route.query(), &RouteQuery::StartOnly(id("A")));
    }

    #[test]
    fn test_set_query_validates_both_ends() {
        let g = triangle_graph();
        let hz = HazardSet::default();
        let mut route = RouteState::default();
        assert!(route.set_query(&g, &hz, &id("A"), &id("nope")).is_err());
        assert_eq!(route, RouteState::default());
        route.set_query(&g, &hz, &id("A"), &id("C")).unwrap();
        assert_eq!(route.plan().unwrap().cost, 2);
    }

    #[test]
    fn test_recompute_reports_changes() {
        let g = triangle_graph();
        let mut hz = HazardSet::default();
        let mut route = RouteState::default();
        route.set_query(&g, &hz, &id("A"), &id("C")).unwrap();
        assert!(!route.recompute(&g, &hz));

        hz.add(&g, &id("B"), DisasterKind::Fire, 0).unwrap();
        assert!(route.crosses_hazard(&hz));
        assert!(route.recompute(&g, &hz));
        assert_eq!(route.path(), &[id("A"), id("C")]);
        assert!(!route.crosses_hazard(&hz));
    }

    #[test]
    fn test_clear() {
        let g = triangle_graph();
        let hz = HazardSet::default();
        let mut route = RouteState::default();
        route.set_query(&g, &hz, &id("A"), &id("C")).unwrap();
        route.clear();
        assert_eq!(route, RouteState::default());
    }
}
