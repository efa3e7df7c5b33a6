use super::types::{distance, Point};
use crate::common::{DomainError, DomainResult};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing cached costs against recomputed ones.
const COST_TOLERANCE: f64 = 1e-9;

/// Stable handle into a [`Tree`]. Handles are never invalidated; nodes are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningNode {
    pub id: NodeId,
    pub point: Point,
    pub parent: Option<NodeId>,
    /// Cached cost-to-start. Kept equal to the summed edge lengths up to the root.
    pub cost: f64,
    children: Vec<NodeId>,
}

impl PlanningNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Result of moving a node under a new parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rewire {
    pub node: NodeId,
    pub old_parent: NodeId,
    pub new_parent: NodeId,
    pub old_cost: f64,
    pub new_cost: f64,
}

/// Arena of planning nodes for one episode. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<PlanningNode>,
}

impl Tree {
    pub fn new(root: Point) -> Self {
        Self {
            nodes: vec![PlanningNode {
                id: NodeId(0),
                point: root,
                parent: None,
                cost: 0.0,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PlanningNode] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> DomainResult<&PlanningNode> {
        self.nodes
            .get(id.0)
            .ok_or(DomainError::UnknownNode { id: id.0 })
    }

    pub fn point(&self, id: NodeId) -> DomainResult<Point> {
        Ok(self.get(id)?.point)
    }

    pub fn cost(&self, id: NodeId) -> DomainResult<f64> {
        Ok(self.get(id)?.cost)
    }

    /// Cost of reaching `p` from the root when routed through `via`.
    pub fn cost_through(&self, via: NodeId, p: &Point) -> DomainResult<f64> {
        let node = self.get(via)?;
        Ok(node.cost + distance(&node.point, p))
    }

    /// Append a node under `parent` and return its handle.
    pub fn insert(&mut self, point: Point, parent: NodeId) -> DomainResult<NodeId> {
        let cost = self.cost_through(parent, &point)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(PlanningNode {
            id,
            point,
            parent: Some(parent),
            cost,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Node closest to `p`; ties go to the earliest inserted node.
    pub fn nearest(&self, p: &Point) -> NodeId {
        self.nodes
            .iter()
            .min_by_key(|n| OrderedFloat(distance(&n.point, p)))
            .map(|n| n.id)
            .unwrap_or(NodeId(0))
    }

    /// All nodes strictly closer than `radius` to `p`, in insertion order.
    pub fn within(&self, p: &Point, radius: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| distance(&n.point, p) < radius)
            .map(|n| n.id)
            .collect()
    }

    /// Neighbor minimizing the cost of reaching `candidate` through it.
    pub fn best_parent(&self, candidate: &Point, neighbors: &[NodeId]) -> DomainResult<NodeId> {
        let mut best: Option<(NodeId, OrderedFloat<f64>)> = None;
        for &id in neighbors {
            let cost = OrderedFloat(self.cost_through(id, candidate)?);
            if best.map_or(true, |(_, c)| cost < c) {
                best = Some((id, cost));
            }
        }
        best.map(|(id, _)| id).ok_or(DomainError::EmptyNeighborhood)
    }

    /// True if `ancestor` lies on the parent chain of `node` (a node is its own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> DomainResult<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.get(id)?.parent;
        }
        Ok(false)
    }

    /// Move `node` under `new_parent`, refreshing the cached cost of its whole subtree.
    pub fn rewire(&mut self, node: NodeId, new_parent: NodeId) -> DomainResult<Rewire> {
        let old_parent = self.get(node)?.parent.ok_or(DomainError::RootRewire)?;
        self.get(new_parent)?;
        if self.is_ancestor(node, new_parent)? {
            return Err(DomainError::CycleRejected {
                node: node.0,
                parent: new_parent.0,
            });
        }

        let old_cost = self.nodes[node.0].cost;
        let new_cost = self.cost_through(new_parent, &self.nodes[node.0].point)?;

        self.nodes[old_parent.0].children.retain(|c| *c != node);
        self.nodes[new_parent.0].children.push(node);
        let moved = &mut self.nodes[node.0];
        moved.parent = Some(new_parent);
        moved.cost = new_cost;
        self.propagate_cost(node);

        Ok(Rewire {
            node,
            old_parent,
            new_parent,
            old_cost,
            new_cost,
        })
    }

    /// Re-parent every candidate whose cost-to-start strictly drops when routed through `hub`.
    ///
    /// `edge_ok` may veto an edge (for example on collision). Ancestors of `hub` are skipped.
    /// Edge length is not limited here; it is bounded only by how `candidates` was gathered.
    pub fn rewire_through<F>(
        &mut self,
        hub: NodeId,
        candidates: &[NodeId],
        mut edge_ok: F,
    ) -> DomainResult<Vec<Rewire>>
    where
        F: FnMut(&Point, &Point) -> bool,
    {
        let hub_point = self.point(hub)?;
        let mut rewired = Vec::new();
        for &candidate in candidates {
            if candidate == hub || self.get(candidate)?.parent.is_none() {
                continue;
            }
            let node = self.get(candidate)?;
            let through_hub = self.cost_through(hub, &node.point)?;
            if through_hub >= node.cost || node.parent == Some(hub) {
                continue;
            }
            if self.is_ancestor(candidate, hub)? || !edge_ok(&hub_point, &node.point) {
                continue;
            }
            rewired.push(self.rewire(candidate, hub)?);
        }
        Ok(rewired)
    }

    fn propagate_cost(&mut self, from: NodeId) {
        let mut stack = self.nodes[from.0].children.clone();
        while let Some(id) = stack.pop() {
            if let Some(parent) = self.nodes[id.0].parent {
                let parent_node = &self.nodes[parent.0];
                let cost = parent_node.cost + distance(&parent_node.point, &self.nodes[id.0].point);
                self.nodes[id.0].cost = cost;
            }
            stack.extend_from_slice(&self.nodes[id.0].children);
        }
    }

    /// Cost-to-start recomputed by walking parent links, ignoring the cache.
    pub fn recompute_cost(&self, id: NodeId) -> DomainResult<f64> {
        let mut cost = 0.0;
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent {
            let parent_node = self.get(parent)?;
            cost += distance(&current.point, &parent_node.point);
            current = parent_node;
        }
        Ok(cost)
    }

    /// Handles from `id` up to and including the root.
    pub fn path_to_root(&self, id: NodeId) -> DomainResult<Vec<NodeId>> {
        let mut path = vec![id];
        let mut current = self.get(id)?.parent;
        while let Some(parent) = current {
            if path.len() > self.nodes.len() {
                return Err(DomainError::TreeInvariant(format!(
                    "parent chain from node {} does not reach the root",
                    id.0
                )));
            }
            path.push(parent);
            current = self.get(parent)?.parent;
        }
        Ok(path)
    }

    /// Check the single-root, acyclic, and cost-consistency invariants.
    pub fn verify(&self) -> DomainResult<()> {
        let roots = self.nodes.iter().filter(|n| n.parent.is_none()).count();
        if roots != 1 || self.nodes.first().map_or(true, |n| n.parent.is_some()) {
            return Err(DomainError::TreeInvariant(format!(
                "expected node 0 to be the only root, found {} roots",
                roots
            )));
        }
        for node in &self.nodes {
            let path = self.path_to_root(node.id)?;
            if path.last() != Some(&self.root()) {
                return Err(DomainError::TreeInvariant(format!(
                    "node {} is not connected to the root",
                    node.id.0
                )));
            }
            let recomputed = self.recompute_cost(node.id)?;
            if (recomputed - node.cost).abs() > COST_TOLERANCE * recomputed.max(1.0) {
                return Err(DomainError::TreeInvariant(format!(
                    "node {} caches cost {} but its path costs {}",
                    node.id.0, node.cost, recomputed
                )));
            }
            if let Some(parent) = node.parent {
                let listed = self
                    .get(parent)?
                    .children
                    .iter()
                    .filter(|c| **c == node.id)
                    .count();
                if listed != 1 {
                    return Err(DomainError::TreeInvariant(format!(
                        "node {} is listed {} times under parent {}",
                        node.id.0, listed, parent.0
                    )));
                }
            }
        }
        Ok(())
    }
}
