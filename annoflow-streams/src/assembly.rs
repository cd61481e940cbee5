//! The innermost stage: turns a flat record source into feature trees.

use std::collections::VecDeque;

use log::{debug, warn};

use annoflow_core::errors::StreamError;
use annoflow_core::graph::FeatureGraphIndex;
use annoflow_core::models::{FeatureNode, FeatureRecord, RecordEvent};

use crate::stream::{NodeStream, StreamLatch, StreamResult};

///
/// AssemblyStage struct, builds the feature forest implied by parent IDs.
///
/// Records are buffered in a [FeatureGraphIndex] until the source signals
/// [RecordEvent::Resolve] or runs dry; then every finished tree is emitted in
/// the order its first record arrived. The lookahead is therefore one
/// resolution block.
///
pub struct AssemblyStage<I> {
    source: I,
    index: FeatureGraphIndex,
    ready: VecDeque<FeatureNode>,
    source_done: bool,
    drop_pseudo_parents: bool,
    latch: StreamLatch,
}

impl<I> AssemblyStage<I>
where
    I: Iterator<Item = Result<RecordEvent, StreamError>>,
{
    pub fn new(source: I) -> Self {
        AssemblyStage {
            source,
            index: FeatureGraphIndex::new(),
            ready: VecDeque::new(),
            source_done: false,
            drop_pseudo_parents: false,
            latch: StreamLatch::default(),
        }
    }

    ///
    /// Emit the children of an unresolved pseudo-parent as separate trees
    /// instead of the placeholder itself.
    ///
    pub fn with_drop_pseudo_parents(mut self, drop_pseudo_parents: bool) -> Self {
        self.drop_pseudo_parents = drop_pseudo_parents;
        self
    }

    fn insert(&mut self, record: FeatureRecord) -> Result<(), StreamError> {
        record.validate()?;
        let id = record.id.clone();
        let parent = record.parent.clone();
        let node = FeatureNode::from(record);

        let nid = match id {
            Some(id) => self.index.add(&id, node)?,
            None => self.index.add_anonymous(node),
        };

        if let Some(parent_id) = parent {
            if self.index.get(&parent_id).is_none() {
                let child = self
                    .index
                    .entry(nid)
                    .map(|entry| entry.node())
                    .ok_or_else(|| StreamError::Source(format!("lost arena entry {}", nid)))?;
                let pseudo = FeatureNode::pseudo_parent(&parent_id, child);
                self.index.add_pseudo_parent(&parent_id, pseudo)?;
            }
            self.index.attach(nid, &parent_id)?;
        }
        Ok(())
    }

    fn resolve(&mut self) -> Result<(), StreamError> {
        for tree in self.index.drain_trees()? {
            if tree.is_pseudo() && self.drop_pseudo_parents {
                warn!(
                    "Parent {} never appeared; emitting its {} children on their own",
                    tree.label(),
                    tree.children.len()
                );
                self.ready.extend(tree.children);
            } else {
                debug!("Assembled tree {} with {} features", tree.label(), tree.count());
                self.ready.push_back(tree);
            }
        }
        Ok(())
    }

    fn advance(&mut self) -> StreamResult {
        loop {
            if let Some(tree) = self.ready.pop_front() {
                return Ok(Some(tree));
            }
            if self.source_done {
                return Ok(None);
            }
            match self.source.next() {
                Some(Ok(RecordEvent::Feature(record))) => self.insert(record)?,
                Some(Ok(RecordEvent::Resolve)) => self.resolve()?,
                Some(Err(err)) => return Err(err),
                None => {
                    self.source_done = true;
                    self.resolve()?;
                }
            }
        }
    }
}

impl<I> NodeStream for AssemblyStage<I>
where
    I: Iterator<Item = Result<RecordEvent, StreamError>>,
{
    fn next_tree(&mut self) -> StreamResult {
        if let Some(done) = self.latch.terminal() {
            return done;
        }
        let result = self.advance();
        self.latch.record(&result);
        result
    }
}
