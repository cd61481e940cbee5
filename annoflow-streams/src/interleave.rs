use std::collections::VecDeque;

use log::debug;

use annoflow_core::errors::StreamError;
use annoflow_core::models::{FeatureNode, Range, Strand};

use crate::stream::{NodeStream, StreamLatch, StreamResult};

/// Source column given to synthesized inter features.
pub const INTER_FEATURE_SOURCE: &str = "annoflow";

/// The last `outside_type` feature seen, kept to measure the next gap.
#[derive(Debug, Clone)]
struct Anchor {
    seqid: String,
    range: Range,
    strand: Strand,
}

impl Anchor {
    fn of(node: &FeatureNode) -> Self {
        Anchor {
            seqid: node.seqid.clone(),
            range: node.range,
            strand: node.strand,
        }
    }

    ///
    /// Range strictly between this anchor and `next`, if both sit on the same
    /// sequence and do not touch or overlap.
    ///
    fn gap_to(&self, next: &FeatureNode) -> Option<Range> {
        if self.seqid != next.seqid {
            return None;
        }
        self.range.gap_to(&next.range)
    }
}

///
/// InterleavingStage struct, inserts an `inter_type` feature into every gap
/// between two consecutive `outside_type` features.
///
/// With 1-based closed coordinates, features at `[1, 10]` and `[21, 30]`
/// get an inter feature at `[11, 20]`. Adjacent or overlapping pairs, pairs
/// on different sequences, and the open ends before the first and after the
/// last feature get nothing. At the top level the inter feature is emitted
/// right before the second feature of the pair; inside a tree it is inserted
/// between the two siblings.
///
pub struct InterleavingStage<S> {
    upstream: S,
    outside_type: String,
    inter_type: String,
    last_outside: Option<Anchor>,
    pending: VecDeque<FeatureNode>,
    latch: StreamLatch,
}

impl<S: NodeStream> InterleavingStage<S> {
    pub fn new(upstream: S, outside_type: &str, inter_type: &str) -> Result<Self, StreamError> {
        if outside_type.is_empty() || inter_type.is_empty() {
            return Err(StreamError::InvalidConfig(
                "interleaving stage needs non-empty outside and inter types".to_string(),
            ));
        }
        Ok(InterleavingStage {
            upstream,
            outside_type: outside_type.to_string(),
            inter_type: inter_type.to_string(),
            last_outside: None,
            pending: VecDeque::new(),
            latch: StreamLatch::default(),
        })
    }

    fn inter_feature(&self, prev: &Anchor, next: &FeatureNode, gap: Range, parent: Option<&str>) -> FeatureNode {
        let strand = if prev.strand == next.strand {
            prev.strand
        } else {
            Strand::Unknown
        };
        FeatureNode {
            id: None,
            parent: parent.map(str::to_string),
            seqid: next.seqid.clone(),
            source: INTER_FEATURE_SOURCE.to_string(),
            feature_type: self.inter_type.clone(),
            range: gap,
            score: None,
            strand,
            phase: None,
            attributes: Vec::new(),
            children: Vec::new(),
            pseudo: false,
        }
    }

    fn interleave_children(&self, node: &mut FeatureNode) {
        if node.children.is_empty() {
            return;
        }
        let children = std::mem::take(&mut node.children);
        let mut last: Option<Anchor> = None;
        for mut child in children {
            self.interleave_children(&mut child);
            if child.has_type(&self.outside_type) {
                if let Some(prev) = &last {
                    if let Some(gap) = prev.gap_to(&child) {
                        let inter = self.inter_feature(prev, &child, gap, node.id.as_deref());
                        node.children.push(inter);
                    }
                }
                last = Some(Anchor::of(&child));
            }
            node.children.push(child);
        }
    }

    fn advance(&mut self) -> StreamResult {
        if let Some(node) = self.pending.pop_front() {
            return Ok(Some(node));
        }
        let Some(mut tree) = self.upstream.next_tree()? else {
            return Ok(None);
        };
        self.interleave_children(&mut tree);
        if !tree.has_type(&self.outside_type) {
            return Ok(Some(tree));
        }

        let inter = self.last_outside.as_ref().and_then(|prev| {
            prev.gap_to(&tree)
                .map(|gap| self.inter_feature(prev, &tree, gap, None))
        });
        self.last_outside = Some(Anchor::of(&tree));
        match inter {
            Some(inter) => {
                debug!("Inserting {} at {}:{}", self.inter_type, inter.seqid, inter.range);
                self.pending.push_back(tree);
                Ok(Some(inter))
            }
            None => Ok(Some(tree)),
        }
    }
}

impl<S: NodeStream> NodeStream for InterleavingStage<S> {
    fn next_tree(&mut self) -> StreamResult {
        if let Some(done) = self.latch.terminal() {
            return done;
        }
        let result = self.advance();
        self.latch.record(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{ArrayInStream, collect};
    use annoflow_core::models::FeatureRecord;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn node(seqid: &str, feature_type: &str, start: u64, end: u64) -> FeatureNode {
        FeatureNode::from(FeatureRecord::new(
            None,
            None,
            seqid,
            feature_type,
            Range { start, end },
        ))
    }

    fn summary(trees: &[FeatureNode]) -> Vec<(String, u64, u64)> {
        trees
            .iter()
            .map(|t| (t.feature_type.clone(), t.range.start, t.range.end))
            .collect()
    }

    fn run(trees: Vec<FeatureNode>) -> Vec<FeatureNode> {
        let mut stage =
            InterleavingStage::new(ArrayInStream::new(trees), "gene", "intergenic").unwrap();
        collect(&mut stage).unwrap()
    }

    #[rstest]
    fn test_gap_gets_inter_feature() {
        let trees = run(vec![node("chr1", "gene", 1, 10), node("chr1", "gene", 21, 30)]);
        assert_eq!(
            summary(&trees),
            vec![
                ("gene".to_string(), 1, 10),
                ("intergenic".to_string(), 11, 20),
                ("gene".to_string(), 21, 30),
            ]
        );
        assert_eq!(trees[1].source, INTER_FEATURE_SOURCE);
    }

    #[rstest]
    #[case(5, 30)]
    #[case(11, 30)]
    fn test_overlapping_or_adjacent_pair_gets_nothing(#[case] start: u64, #[case] end: u64) {
        let trees = run(vec![node("chr1", "gene", 1, 10), node("chr1", "gene", start, end)]);
        assert_eq!(trees.len(), 2);
    }

    #[rstest]
    fn test_other_types_do_not_break_pairs() {
        let trees = run(vec![
            node("chr1", "gene", 1, 10),
            node("chr1", "repeat_region", 12, 14),
            node("chr1", "gene", 21, 30),
            node("chr1", "gene", 41, 50),
        ]);
        assert_eq!(
            summary(&trees),
            vec![
                ("gene".to_string(), 1, 10),
                ("repeat_region".to_string(), 12, 14),
                ("intergenic".to_string(), 11, 20),
                ("gene".to_string(), 21, 30),
                ("intergenic".to_string(), 31, 40),
                ("gene".to_string(), 41, 50),
            ]
        );
    }

    #[rstest]
    fn test_sequence_change_resets_pairing() {
        let trees = run(vec![node("chr1", "gene", 1, 10), node("chr2", "gene", 21, 30)]);
        assert_eq!(trees.len(), 2);
    }

    #[rstest]
    fn test_single_feature_has_no_open_ends() {
        let trees = run(vec![node("chr1", "gene", 100, 200)]);
        assert_eq!(trees.len(), 1);
    }

    #[rstest]
    fn test_introns_between_exon_siblings() {
        let mut mrna = FeatureNode::from(FeatureRecord::new(
            Some("t1"),
            None,
            "chr1",
            "mRNA",
            Range { start: 1, end: 100 },
        ));
        let mut exon = |start, end| {
            let mut e = node("chr1", "exon", start, end);
            e.parent = Some("t1".to_string());
            e.strand = Strand::Forward;
            mrna.add_child(e);
        };
        exon(1, 20);
        exon(41, 60);
        exon(81, 100);

        let mut stage = InterleavingStage::new(ArrayInStream::new(vec![mrna]), "exon", "intron").unwrap();
        let trees = collect(&mut stage).unwrap();
        let children = &trees[0].children;
        assert_eq!(
            summary(children),
            vec![
                ("exon".to_string(), 1, 20),
                ("intron".to_string(), 21, 40),
                ("exon".to_string(), 41, 60),
                ("intron".to_string(), 61, 80),
                ("exon".to_string(), 81, 100),
            ]
        );
        assert_eq!(children[1].parent.as_deref(), Some("t1"));
        assert_eq!(children[1].strand, Strand::Forward);
    }
}
