use std::collections::VecDeque;

use annoflow_core::errors::StreamError;
use annoflow_core::models::{FeatureNode, FeatureRecord, RecordEvent};

/// Outcome of one pull: a finished tree, end of stream (`None`), or an error.
pub type StreamResult = Result<Option<FeatureNode>, StreamError>;

///
/// The pull contract every pipeline stage implements.
///
/// A call may pull from the upstream stage any bounded number of times before
/// answering. Once a stream has returned `Ok(None)` or an error, every later
/// call returns that same terminal signal.
///
pub trait NodeStream {
    fn next_tree(&mut self) -> StreamResult;
}

impl<S: NodeStream + ?Sized> NodeStream for Box<S> {
    fn next_tree(&mut self) -> StreamResult {
        (**self).next_tree()
    }
}

impl<S: NodeStream + ?Sized> NodeStream for &mut S {
    fn next_tree(&mut self) -> StreamResult {
        (**self).next_tree()
    }
}

///
/// Remembers how a stage terminated so later pulls repeat it without touching
/// the upstream again.
///
#[derive(Debug, Default)]
pub enum StreamLatch {
    #[default]
    Open,
    Ended,
    Failed(StreamError),
}

impl StreamLatch {
    /// The terminal signal to repeat, or `None` while the stream is still live.
    pub fn terminal(&self) -> Option<StreamResult> {
        match self {
            StreamLatch::Open => None,
            StreamLatch::Ended => Some(Ok(None)),
            StreamLatch::Failed(err) => Some(Err(err.clone())),
        }
    }

    pub fn record(&mut self, result: &StreamResult) {
        match result {
            Ok(Some(_)) => {}
            Ok(None) => *self = StreamLatch::Ended,
            Err(err) => *self = StreamLatch::Failed(err.clone()),
        }
    }
}

///
/// Drain a stream into memory. Stops at the first error.
///
pub fn collect<S: NodeStream + ?Sized>(stream: &mut S) -> Result<Vec<FeatureNode>, StreamError> {
    let mut trees = Vec::new();
    while let Some(tree) = stream.next_tree()? {
        trees.push(tree);
    }
    Ok(trees)
}

///
/// ArrayInStream struct, feeds already built trees into a pipeline.
///
#[derive(Debug, Default)]
pub struct ArrayInStream {
    trees: VecDeque<FeatureNode>,
}

impl ArrayInStream {
    pub fn new(trees: Vec<FeatureNode>) -> Self {
        ArrayInStream {
            trees: trees.into(),
        }
    }
}

impl NodeStream for ArrayInStream {
    fn next_tree(&mut self) -> StreamResult {
        Ok(self.trees.pop_front())
    }
}

///
/// RecordArraySource struct, an in-memory record source for the assembly
/// stage.
///
#[derive(Debug)]
pub struct RecordArraySource {
    events: std::vec::IntoIter<RecordEvent>,
}

impl From<Vec<RecordEvent>> for RecordArraySource {
    fn from(events: Vec<RecordEvent>) -> Self {
        RecordArraySource {
            events: events.into_iter(),
        }
    }
}

impl From<Vec<FeatureRecord>> for RecordArraySource {
    fn from(records: Vec<FeatureRecord>) -> Self {
        records
            .into_iter()
            .map(RecordEvent::from)
            .collect::<Vec<_>>()
            .into()
    }
}

impl Iterator for RecordArraySource {
    type Item = Result<RecordEvent, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next().map(Ok)
    }
}
