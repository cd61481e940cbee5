use std::fmt::{self, Display};

use crate::models::{FeatureRecord, Range, Strand};

/// Type name given to synthesized placeholder parents.
pub const PSEUDO_PARENT_TYPE: &str = "pseudo_parent";

///
/// FeatureNode struct, one feature together with the subtree it owns.
///
/// Parent relations are stored by ID (`parent`), never by reference; the
/// owned `children` are what a downstream stage receives.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureNode {
    pub id: Option<String>,
    pub parent: Option<String>,
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub range: Range,
    pub score: Option<f32>,
    pub strand: Strand,
    pub phase: Option<u8>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<FeatureNode>,
    /// Set on placeholders synthesized for parent IDs that never arrived.
    pub pseudo: bool,
}

impl FeatureNode {
    ///
    /// Placeholder for an unresolved parent ID, seeded from its first child.
    ///
    pub fn pseudo_parent(id: &str, first_child: &FeatureNode) -> Self {
        FeatureNode {
            id: Some(id.to_string()),
            parent: None,
            seqid: first_child.seqid.clone(),
            source: first_child.source.clone(),
            feature_type: PSEUDO_PARENT_TYPE.to_string(),
            range: first_child.range,
            score: None,
            strand: first_child.strand,
            phase: None,
            attributes: Vec::new(),
            children: Vec::new(),
            pseudo: true,
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.pseudo
    }

    pub fn has_type(&self, feature_type: &str) -> bool {
        self.feature_type == feature_type
    }

    /// ID if present, otherwise a positional description for messages.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!(
                "{}:{}:{}",
                self.feature_type, self.seqid, self.range
            ),
        }
    }

    pub fn add_child(&mut self, child: FeatureNode) {
        self.children.push(child);
    }

    ///
    /// Copy of this feature under another type name, without children.
    ///
    /// The ID is dropped so the copy cannot collide with the original; the
    /// parent reference is kept so both stay siblings.
    ///
    pub fn duplicate_as(&self, feature_type: &str) -> FeatureNode {
        FeatureNode {
            id: None,
            parent: self.parent.clone(),
            seqid: self.seqid.clone(),
            source: self.source.clone(),
            feature_type: feature_type.to_string(),
            range: self.range,
            score: self.score,
            strand: self.strand,
            phase: self.phase,
            attributes: self.attributes.clone(),
            children: Vec::new(),
            pseudo: false,
        }
    }

    /// Copy the record-level fields back out, without children.
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord {
            id: self.id.clone(),
            parent: self.parent.clone(),
            seqid: self.seqid.clone(),
            source: self.source.clone(),
            feature_type: self.feature_type.clone(),
            range: self.range,
            score: self.score,
            strand: self.strand,
            phase: self.phase,
            attributes: self.attributes.clone(),
        }
    }

    /// Depth-first, parent-before-children traversal of the subtree.
    pub fn iter(&self) -> Features<'_> {
        Features { stack: vec![self] }
    }

    /// Number of features in the subtree, this one included.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    ///
    /// Flatten the subtree back into records, depth-first and
    /// parent-before-children. Pseudo-parents are skipped; their children
    /// keep the parent ID they were declared with.
    ///
    pub fn flatten(&self) -> Vec<FeatureRecord> {
        self.iter()
            .filter(|node| !node.is_pseudo())
            .map(FeatureNode::to_record)
            .collect()
    }
}

impl From<FeatureRecord> for FeatureNode {
    fn from(record: FeatureRecord) -> Self {
        FeatureNode {
            id: record.id,
            parent: record.parent,
            seqid: record.seqid,
            source: record.source,
            feature_type: record.feature_type,
            range: record.range,
            score: record.score,
            strand: record.strand,
            phase: record.phase,
            attributes: record.attributes,
            children: Vec::new(),
            pseudo: false,
        }
    }
}

impl Display for FeatureNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{} ({})",
            self.feature_type,
            self.seqid,
            self.range,
            self.label()
        )
    }
}

/// Pre-order iterator over a feature subtree.
pub struct Features<'a> {
    stack: Vec<&'a FeatureNode>,
}

impl<'a> Iterator for Features<'a> {
    type Item = &'a FeatureNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
