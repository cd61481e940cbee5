use std::collections::BTreeMap;
use std::fmt::{self, Display};

use log::info;
use serde::Serialize;

use annoflow_core::models::FeatureNode;

use crate::stream::{NodeStream, StreamLatch, StreamResult};

/// Counters gathered by a [StatStage].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamStats {
    pub trees: usize,
    pub features: usize,
    pub pseudo_parents: usize,
    pub features_per_type: BTreeMap<String, usize>,
}

impl StreamStats {
    fn observe(&mut self, tree: &FeatureNode) {
        self.trees += 1;
        for node in tree.iter() {
            if node.is_pseudo() {
                self.pseudo_parents += 1;
                continue;
            }
            self.features += 1;
            *self
                .features_per_type
                .entry(node.feature_type.clone())
                .or_default() += 1;
        }
    }
}

impl Display for StreamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "parsed feature trees: {}", self.trees)?;
        writeln!(f, "features: {}", self.features)?;
        writeln!(f, "pseudo-parents: {}", self.pseudo_parents)?;
        for (feature_type, count) in &self.features_per_type {
            writeln!(f, "{}s: {}", feature_type, count)?;
        }
        Ok(())
    }
}

///
/// StatStage struct, passes every tree through unchanged while counting it.
///
pub struct StatStage<S> {
    upstream: S,
    stats: StreamStats,
    latch: StreamLatch,
}

impl<S: NodeStream> StatStage<S> {
    pub fn new(upstream: S) -> Self {
        StatStage {
            upstream,
            stats: StreamStats::default(),
            latch: StreamLatch::default(),
        }
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }
}

impl<S: NodeStream> NodeStream for StatStage<S> {
    fn next_tree(&mut self) -> StreamResult {
        if let Some(done) = self.latch.terminal() {
            return done;
        }
        let result = self.upstream.next_tree();
        match &result {
            Ok(Some(tree)) => self.stats.observe(tree),
            Ok(None) => info!(
                "Stream finished: {} trees, {} features, {} pseudo-parents",
                self.stats.trees, self.stats.features, self.stats.pseudo_parents
            ),
            Err(_) => {}
        }
        self.latch.record(&result);
        result
    }
}
