use annoflow_core::errors::StreamError;
use annoflow_core::models::FeatureNode;
use annoflow_core::traits::TypeChecker;

use crate::stream::{NodeStream, StreamLatch, StreamResult};

///
/// TypeCheckStage struct, rejects trees that use a type the checker does not
/// know. Pseudo-parents are synthetic and are not checked.
///
pub struct TypeCheckStage<S, C> {
    upstream: S,
    checker: C,
    latch: StreamLatch,
}

impl<S: NodeStream, C: TypeChecker> TypeCheckStage<S, C> {
    pub fn new(upstream: S, checker: C) -> Self {
        TypeCheckStage {
            upstream,
            checker,
            latch: StreamLatch::default(),
        }
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    fn check(&self, tree: &FeatureNode) -> Result<(), StreamError> {
        match tree
            .iter()
            .filter(|node| !node.is_pseudo())
            .find(|node| !self.checker.is_valid_type(&node.feature_type))
        {
            Some(node) => Err(StreamError::InvalidType {
                feature: node.label(),
                feature_type: node.feature_type.clone(),
            }),
            None => Ok(()),
        }
    }

    fn advance(&mut self) -> StreamResult {
        let Some(tree) = self.upstream.next_tree()? else {
            return Ok(None);
        };
        self.check(&tree)?;
        Ok(Some(tree))
    }
}

impl<S: NodeStream, C: TypeChecker> NodeStream for TypeCheckStage<S, C> {
    fn next_tree(&mut self) -> StreamResult {
        if let Some(done) = self.latch.terminal() {
            return done;
        }
        let result = self.advance();
        self.latch.record(&result);
        result
    }
}
