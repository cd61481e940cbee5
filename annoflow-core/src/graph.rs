//! ID-indexed arena used to assemble feature records into trees.
//!
//! Records may arrive in any order. A child whose parent has not been seen yet
//! is attached to a pseudo-parent, which is merged with the real record once
//! it shows up. Nodes never own each other inside the index: every relation is
//! a [NodeId] into the arena, so no reference cycles can form even when the
//! input declares a parent cycle. Such cycles are detected by [FeatureGraphIndex::find_root].

use std::collections::HashSet;

use fxhash::FxHashMap as HashMap;
use log::debug;

use crate::errors::GraphError;
use crate::models::FeatureNode;

/// Position of an entry inside the index arena.
pub type NodeId = usize;

///
/// Slot struct, the payload of one arena entry.
///
/// `node` never holds children here; the tree shape lives in `children`.
///
#[derive(Debug, Clone)]
pub struct Slot {
    pub node: FeatureNode,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Slot {
    fn new(mut node: FeatureNode) -> Self {
        node.children.clear();
        Slot {
            node,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An index entry is either a parsed feature or a synthesized placeholder.
#[derive(Debug, Clone)]
pub enum Entry {
    Real(Slot),
    Pseudo(Slot),
}

impl Entry {
    pub fn slot(&self) -> &Slot {
        match self {
            Entry::Real(slot) | Entry::Pseudo(slot) => slot,
        }
    }

    fn slot_mut(&mut self) -> &mut Slot {
        match self {
            Entry::Real(slot) | Entry::Pseudo(slot) => slot,
        }
    }

    pub fn node(&self) -> &FeatureNode {
        &self.slot().node
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(self, Entry::Pseudo(_))
    }

    ///
    /// Turn a pseudo entry into a real one carrying `node`'s attributes.
    /// Children already collected by the placeholder stay attached.
    ///
    fn merge(&mut self, mut node: FeatureNode) -> Result<(), GraphError> {
        match self {
            Entry::Real(slot) => Err(GraphError::DuplicateId(slot.node.label())),
            Entry::Pseudo(slot) => {
                let children = std::mem::take(&mut slot.children);
                node.children.clear();
                node.pseudo = false;
                *self = Entry::Real(Slot {
                    node,
                    parent: None,
                    children,
                });
                Ok(())
            }
        }
    }
}

///
/// FeatureGraphIndex struct, maps feature IDs to arena entries for the
/// lifetime of one assembly pass.
///
#[derive(Debug, Default)]
pub struct FeatureGraphIndex {
    entries: Vec<Entry>,
    ids: HashMap<String, NodeId>,
}

impl FeatureGraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    ///
    /// Look up the entry registered under `id`, real or pseudo.
    ///
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.ids.get(id).map(|&nid| &self.entries[nid])
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn entry(&self, nid: NodeId) -> Option<&Entry> {
        self.entries.get(nid)
    }

    ///
    /// Register a parsed feature under `id`.
    ///
    /// A pseudo-parent already registered under `id` is merged with `node`
    /// and keeps its children, which must share `node`'s seqid. A real
    /// feature under the same ID is a [GraphError::DuplicateId].
    ///
    pub fn add(&mut self, id: &str, node: FeatureNode) -> Result<NodeId, GraphError> {
        match self.ids.get(id) {
            Some(&nid) => {
                if let Entry::Pseudo(slot) = &self.entries[nid] {
                    self.check_children_seqid(slot, id, &node.seqid)?;
                }
                self.entries[nid].merge(node)?;
                debug!("Merged feature {} into its pseudo-parent", id);
                Ok(nid)
            }
            None => {
                let nid = self.push(Entry::Real(Slot::new(node)));
                self.ids.insert(id.to_string(), nid);
                Ok(nid)
            }
        }
    }

    fn check_children_seqid(&self, slot: &Slot, id: &str, seqid: &str) -> Result<(), GraphError> {
        for &child in &slot.children {
            let child = self.entries[child].node();
            if child.seqid != seqid {
                return Err(GraphError::SeqidMismatch {
                    child: child.label(),
                    child_seqid: child.seqid.clone(),
                    parent: id.to_string(),
                    parent_seqid: seqid.to_string(),
                });
            }
        }
        Ok(())
    }

    ///
    /// Register a feature that has no ID. Nothing can reference it as a
    /// parent, so it only lives in the arena.
    ///
    pub fn add_anonymous(&mut self, node: FeatureNode) -> NodeId {
        self.push(Entry::Real(Slot::new(node)))
    }

    /// The placeholder registered under `id`, if `id` is still unresolved.
    pub fn get_pseudo_parent(&self, id: &str) -> Option<&Entry> {
        self.get(id).filter(|entry| entry.is_pseudo())
    }

    ///
    /// Register a placeholder for a parent ID that has not been seen yet.
    ///
    pub fn add_pseudo_parent(&mut self, id: &str, mut node: FeatureNode) -> Result<NodeId, GraphError> {
        if self.ids.contains_key(id) {
            return Err(GraphError::DuplicateId(id.to_string()));
        }
        node.pseudo = true;
        debug!("Synthesized pseudo-parent {}", id);
        let nid = self.push(Entry::Pseudo(Slot::new(node)));
        self.ids.insert(id.to_string(), nid);
        Ok(nid)
    }

    ///
    /// Make `child` a child of the entry registered under `parent_id`.
    ///
    /// Pseudo-parents grow to cover their children. Linking fails if it
    /// would close a parent cycle.
    ///
    pub fn attach(&mut self, child: NodeId, parent_id: &str) -> Result<(), GraphError> {
        let parent = self
            .node_id(parent_id)
            .ok_or_else(|| GraphError::UnknownId(parent_id.to_string()))?;
        let child_slot = self.entries[child].slot();
        let parent_node = self.entries[parent].node();
        if child_slot.node.seqid != parent_node.seqid {
            return Err(GraphError::SeqidMismatch {
                child: child_slot.node.label(),
                child_seqid: child_slot.node.seqid.clone(),
                parent: parent_id.to_string(),
                parent_seqid: parent_node.seqid.clone(),
            });
        }
        let child_range = child_slot.node.range;

        self.entries[child].slot_mut().parent = Some(parent);
        let parent_entry = &mut self.entries[parent];
        if let Entry::Pseudo(slot) = parent_entry {
            slot.node.range = slot.node.range.join(&child_range);
        }
        parent_entry.slot_mut().children.push(child);

        self.find_root_of(child).map(|_| ())
    }

    ///
    /// Follow parent links from `id` up to the root of its tree.
    ///
    pub fn find_root(&self, id: &str) -> Result<&FeatureNode, GraphError> {
        let nid = self
            .node_id(id)
            .ok_or_else(|| GraphError::UnknownId(id.to_string()))?;
        let root = self.find_root_of(nid)?;
        Ok(self.entries[root].node())
    }

    ///
    /// Walk parent links from `nid`, remembering every visited entry. Seeing
    /// an entry twice means the walk entered a cycle.
    ///
    pub fn find_root_of(&self, nid: NodeId) -> Result<NodeId, GraphError> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut current = nid;
        loop {
            if !visited.insert(current) {
                return Err(self.cycle_error(&path, current));
            }
            path.push(current);
            match self.entries[current].slot().parent {
                Some(parent) => current = parent,
                None => return Ok(current),
            }
        }
    }

    /// Labels of the cycle that `path` entered when it reached `current` again.
    fn cycle_error(&self, path: &[NodeId], current: NodeId) -> GraphError {
        let start = path.iter().position(|&n| n == current).unwrap_or(0);
        let mut cycle: Vec<String> = path[start..]
            .iter()
            .map(|&n| self.entries[n].node().label())
            .collect();
        cycle.push(self.entries[current].node().label());
        GraphError::Cycle(cycle)
    }

    ///
    /// Root entries ordered by the earliest entry of their tree, which is the
    /// arrival order of the first record seen for that tree.
    ///
    /// Each entry's root is resolved once: a walk stops at the first entry
    /// whose root is already known.
    ///
    pub fn roots(&self) -> Result<Vec<NodeId>, GraphError> {
        let len = self.entries.len();
        let mut root_of: Vec<Option<NodeId>> = vec![None; len];
        let mut walked_by: Vec<Option<NodeId>> = vec![None; len];
        let mut listed = vec![false; len];
        let mut roots = Vec::new();
        let mut path = Vec::new();

        for nid in 0..len {
            path.clear();
            let mut current = nid;
            let root = loop {
                if let Some(root) = root_of[current] {
                    break root;
                }
                if walked_by[current] == Some(nid) {
                    return Err(self.cycle_error(&path, current));
                }
                walked_by[current] = Some(nid);
                path.push(current);
                match self.entries[current].slot().parent {
                    Some(parent) => current = parent,
                    None => break current,
                }
            };
            for &n in &path {
                root_of[n] = Some(root);
            }
            if !listed[root] {
                listed[root] = true;
                roots.push(root);
            }
        }
        Ok(roots)
    }

    ///
    /// Materialize the owned tree rooted at `nid`.
    ///
    /// Entries are visited in pre-order with an explicit stack and built in
    /// reverse, so every child is finished before its parent.
    ///
    pub fn build_tree(&self, nid: NodeId) -> FeatureNode {
        let mut order = Vec::new();
        let mut stack = vec![nid];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.entries[current].slot().children.iter().copied());
        }

        let mut built: HashMap<NodeId, FeatureNode> = HashMap::default();
        for &current in order.iter().rev() {
            let slot = self.entries[current].slot();
            let mut node = slot.node.clone();
            node.children = slot
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(current, node);
        }
        built
            .remove(&nid)
            .unwrap_or_else(|| self.entries[nid].node().clone())
    }

    ///
    /// Build every tree in root order, then start a fresh pass.
    ///
    pub fn drain_trees(&mut self) -> Result<Vec<FeatureNode>, GraphError> {
        let roots = self.roots()?;
        let trees = roots.into_iter().map(|root| self.build_tree(root)).collect();
        self.reset();
        Ok(trees)
    }

    /// Forget every mapping; allocated capacity is kept for the next pass.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.ids.clear();
    }

    fn push(&mut self, entry: Entry) -> NodeId {
        self.entries.push(entry);
        self.entries.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureRecord, Range};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_node(id: Option<&str>, parent: Option<&str>, feature_type: &str, start: u64, end: u64) -> FeatureNode {
        FeatureNode::from(FeatureRecord::new(
            id,
            parent,
            "chr1",
            feature_type,
            Range { start, end },
        ))
    }

    /// Minimal version of the assembly step: add, synthesize, attach.
    fn insert(index: &mut FeatureGraphIndex, node: FeatureNode) -> Result<NodeId, GraphError> {
        let parent = node.parent.clone();
        let nid = match node.id.clone() {
            Some(id) => index.add(&id, node)?,
            None => index.add_anonymous(node),
        };
        if let Some(parent_id) = parent {
            if index.get(&parent_id).is_none() {
                let pseudo = FeatureNode::pseudo_parent(&parent_id, index.entry(nid).unwrap().node());
                index.add_pseudo_parent(&parent_id, pseudo)?;
            }
            index.attach(nid, &parent_id)?;
        }
        Ok(nid)
    }

    fn gene_model() -> Vec<FeatureNode> {
        vec![
            make_node(Some("g1"), None, "gene", 1, 100),
            make_node(Some("t1"), Some("g1"), "mRNA", 1, 100),
            make_node(Some("e1"), Some("t1"), "exon", 1, 20),
            make_node(None, Some("t1"), "exon", 50, 100),
        ]
    }

    #[rstest]
    #[case(vec![0, 1, 2, 3])]
    #[case(vec![3, 2, 1, 0])]
    #[case(vec![2, 0, 3, 1])]
    fn test_find_root_is_order_independent(#[case] order: Vec<usize>) {
        let records = gene_model();
        let mut index = FeatureGraphIndex::new();
        for i in order {
            insert(&mut index, records[i].clone()).unwrap();
        }
        for id in ["g1", "t1", "e1"] {
            let root = index.find_root(id).unwrap();
            assert_eq!(root.id.as_deref(), Some("g1"));
            assert!(!root.is_pseudo());
        }
        assert_eq!(index.roots().unwrap().len(), 1);
    }

    #[rstest]
    fn test_pseudo_parent_is_merged_with_real_record() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("e1"), Some("t1"), "exon", 10, 20)).unwrap();
        insert(&mut index, make_node(Some("e2"), Some("t1"), "exon", 40, 60)).unwrap();

        let pseudo = index.get_pseudo_parent("t1").unwrap();
        assert!(pseudo.is_pseudo());
        assert_eq!(pseudo.node().range, Range { start: 10, end: 60 });
        assert_eq!(pseudo.slot().children.len(), 2);

        insert(&mut index, make_node(Some("t1"), None, "mRNA", 1, 100)).unwrap();
        assert!(index.get_pseudo_parent("t1").is_none());
        let merged = index.get("t1").unwrap();
        assert!(!merged.is_pseudo());
        assert_eq!(merged.node().feature_type, "mRNA");
        assert_eq!(merged.node().range, Range { start: 1, end: 100 });
        assert_eq!(merged.slot().children.len(), 2);
        assert_eq!(index.len(), 3);
    }

    #[rstest]
    fn test_out_of_order_tree_matches_dependency_order_tree() {
        let records = gene_model();

        let mut ordered = FeatureGraphIndex::new();
        for record in records.iter().cloned() {
            insert(&mut ordered, record).unwrap();
        }
        let mut shuffled = FeatureGraphIndex::new();
        for record in records.iter().rev().cloned() {
            insert(&mut shuffled, record).unwrap();
        }

        let ordered_trees = ordered.drain_trees().unwrap();
        let shuffled_trees = shuffled.drain_trees().unwrap();
        assert_eq!(ordered_trees.len(), 1);
        assert_eq!(shuffled_trees.len(), 1);
        // child order follows arrival order, so compare the flattened sets
        let mut a = ordered_trees[0].flatten();
        let mut b = shuffled_trees[0].flatten();
        a.sort_by(|x, y| x.range.cmp(&y.range).then(x.feature_type.cmp(&y.feature_type)));
        b.sort_by(|x, y| x.range.cmp(&y.range).then(x.feature_type.cmp(&y.feature_type)));
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_duplicate_real_id_is_rejected() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("g1"), None, "gene", 1, 10)).unwrap();
        let err = insert(&mut index, make_node(Some("g1"), None, "gene", 20, 30)).unwrap_err();
        assert_eq!(err, GraphError::DuplicateId("g1".to_string()));
    }

    #[rstest]
    fn test_pseudo_parent_cannot_shadow_existing_id() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("g1"), None, "gene", 1, 10)).unwrap();
        let pseudo = make_node(Some("g1"), None, "gene", 1, 10);
        assert!(index.add_pseudo_parent("g1", pseudo).is_err());
    }

    #[rstest]
    fn test_two_node_cycle_is_reported() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("A"), Some("B"), "gene", 1, 10)).unwrap();
        let err = insert(&mut index, make_node(Some("B"), Some("A"), "gene", 1, 10)).unwrap_err();
        match err {
            GraphError::Cycle(path) => {
                assert!(path.contains(&"A".to_string()));
                assert!(path.contains(&"B".to_string()));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
        assert!(matches!(index.find_root("A"), Err(GraphError::Cycle(_))));
        assert!(matches!(index.roots(), Err(GraphError::Cycle(_))));
    }

    #[rstest]
    fn test_self_parent_is_a_cycle() {
        let mut index = FeatureGraphIndex::new();
        let err = insert(&mut index, make_node(Some("A"), Some("A"), "gene", 1, 10)).unwrap_err();
        assert_eq!(err, GraphError::Cycle(vec!["A".to_string(), "A".to_string()]));
    }

    #[rstest]
    fn test_seqid_mismatch_is_rejected() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("g1"), None, "gene", 1, 10)).unwrap();
        let mut child = make_node(Some("t1"), Some("g1"), "mRNA", 1, 10);
        child.seqid = "chr2".to_string();
        assert!(matches!(
            insert(&mut index, child),
            Err(GraphError::SeqidMismatch { .. })
        ));
    }

    #[rstest]
    fn test_seqid_mismatch_is_rejected_when_child_comes_first() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("t1"), Some("g1"), "mRNA", 1, 10)).unwrap();
        let mut parent = make_node(Some("g1"), None, "gene", 1, 10);
        parent.seqid = "chr2".to_string();
        assert_eq!(
            insert(&mut index, parent).unwrap_err(),
            GraphError::SeqidMismatch {
                child: "t1".to_string(),
                child_seqid: "chr1".to_string(),
                parent: "g1".to_string(),
                parent_seqid: "chr2".to_string(),
            }
        );
        assert!(index.get_pseudo_parent("g1").is_some());
    }

    #[rstest]
    fn test_roots_follow_earliest_entry_of_each_tree() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("e1"), Some("t9"), "exon", 5, 9)).unwrap();
        insert(&mut index, make_node(Some("g2"), None, "gene", 50, 90)).unwrap();
        insert(&mut index, make_node(Some("e2"), Some("t9"), "exon", 12, 20)).unwrap();
        insert(&mut index, make_node(Some("t2"), Some("g2"), "mRNA", 50, 90)).unwrap();
        insert(&mut index, make_node(Some("g3"), None, "gene", 100, 120)).unwrap();

        let roots: Vec<String> = index
            .roots()
            .unwrap()
            .into_iter()
            .map(|nid| index.entry(nid).unwrap().node().label())
            .collect();
        assert_eq!(roots, vec!["t9", "g2", "g3"]);
    }

    #[rstest]
    fn test_deep_chain_builds_without_recursion() {
        let depth = 2_000;
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("n0"), None, "region", 1, 10)).unwrap();
        for level in 1..depth {
            let id = format!("n{}", level);
            let parent = format!("n{}", level - 1);
            insert(&mut index, make_node(Some(&id), Some(&parent), "region", 1, 10)).unwrap();
        }

        let trees = index.drain_trees().unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].count(), depth);
        let deepest = trees[0].iter().last().unwrap();
        assert_eq!(deepest.label(), format!("n{}", depth - 1));
    }

    #[rstest]
    fn test_unknown_id() {
        let index = FeatureGraphIndex::new();
        assert!(index.get("nope").is_none());
        assert_eq!(
            index.find_root("nope").unwrap_err(),
            GraphError::UnknownId("nope".to_string())
        );
    }

    #[rstest]
    fn test_reset_clears_mappings() {
        let mut index = FeatureGraphIndex::new();
        insert(&mut index, make_node(Some("g1"), None, "gene", 1, 10)).unwrap();
        index.reset();
        assert!(index.is_empty());
        assert!(index.get("g1").is_none());
        insert(&mut index, make_node(Some("g1"), None, "gene", 1, 10)).unwrap();
        assert_eq!(index.len(), 1);
    }
}
