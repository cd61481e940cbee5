use std::collections::VecDeque;

use log::debug;

use annoflow_core::errors::StreamError;
use annoflow_core::models::FeatureNode;

use crate::stream::{NodeStream, StreamLatch, StreamResult};

///
/// DuplicatingStage struct, emits a copy typed `dest_type` right after every
/// feature typed `source_type`.
///
/// Copies never inherit children. Inside a tree the copy becomes the next
/// sibling of its original; at the top level it is emitted as its own tree
/// directly after the original. Nothing is ever removed from the stream.
///
pub struct DuplicatingStage<S> {
    upstream: S,
    source_type: String,
    dest_type: String,
    queue: VecDeque<FeatureNode>,
    latch: StreamLatch,
}

impl<S: NodeStream> DuplicatingStage<S> {
    pub fn new(upstream: S, source_type: &str, dest_type: &str) -> Result<Self, StreamError> {
        if source_type.is_empty() || dest_type.is_empty() {
            return Err(StreamError::InvalidConfig(
                "duplicating stage needs non-empty source and destination types".to_string(),
            ));
        }
        Ok(DuplicatingStage {
            upstream,
            source_type: source_type.to_string(),
            dest_type: dest_type.to_string(),
            queue: VecDeque::new(),
            latch: StreamLatch::default(),
        })
    }

    fn duplicate_children(&self, node: &mut FeatureNode) {
        if node.children.is_empty() {
            return;
        }
        let children = std::mem::take(&mut node.children);
        for mut child in children {
            self.duplicate_children(&mut child);
            let copy = child
                .has_type(&self.source_type)
                .then(|| child.duplicate_as(&self.dest_type));
            node.children.push(child);
            if let Some(copy) = copy {
                node.children.push(copy);
            }
        }
    }

    fn advance(&mut self) -> StreamResult {
        if let Some(copy) = self.queue.pop_front() {
            return Ok(Some(copy));
        }
        let Some(mut tree) = self.upstream.next_tree()? else {
            return Ok(None);
        };
        self.duplicate_children(&mut tree);
        if tree.has_type(&self.source_type) {
            debug!("Duplicating {} as {}", tree.label(), self.dest_type);
            self.queue.push_back(tree.duplicate_as(&self.dest_type));
        }
        Ok(Some(tree))
    }
}

impl<S: NodeStream> NodeStream for DuplicatingStage<S> {
    fn next_tree(&mut self) -> StreamResult {
        if let Some(done) = self.latch.terminal() {
            return done;
        }
        let result = self.advance();
        self.latch.record(&result);
        result
    }
}
