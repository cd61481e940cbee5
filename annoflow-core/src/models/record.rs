use crate::errors::StreamError;
use crate::models::{Range, Strand};

///
/// FeatureRecord struct, one decoded annotation line as handed over by a
/// record source. Relationships are expressed by ID only.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureRecord {
    pub id: Option<String>,
    pub parent: Option<String>,
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub range: Range,
    pub score: Option<f32>,
    pub strand: Strand,
    pub phase: Option<u8>,
    /// Opaque key/value pairs, kept in input order.
    pub attributes: Vec<(String, String)>,
}

impl FeatureRecord {
    ///
    /// Minimal record with default source, score, strand and phase.
    ///
    pub fn new(
        id: Option<&str>,
        parent: Option<&str>,
        seqid: &str,
        feature_type: &str,
        range: Range,
    ) -> Self {
        FeatureRecord {
            id: id.map(str::to_string),
            parent: parent.map(str::to_string),
            seqid: seqid.to_string(),
            source: ".".to_string(),
            feature_type: feature_type.to_string(),
            range,
            score: None,
            strand: Strand::default(),
            phase: None,
            attributes: Vec::new(),
        }
    }

    /// Reject records a downstream stage could not interpret.
    pub fn validate(&self) -> Result<(), StreamError> {
        let label = self.id.as_deref().unwrap_or("<anonymous>");
        if self.feature_type.is_empty() {
            return Err(StreamError::MalformedRecord(format!(
                "feature {} has an empty type name",
                label
            )));
        }
        if self.seqid.is_empty() {
            return Err(StreamError::MalformedRecord(format!(
                "feature {} has an empty sequence ID",
                label
            )));
        }
        if self.range.end < self.range.start {
            return Err(StreamError::MalformedRecord(format!(
                "feature {} has reversed range {}..{}",
                label, self.range.start, self.range.end
            )));
        }
        if matches!(self.id.as_deref(), Some("")) {
            return Err(StreamError::MalformedRecord(
                "feature ID must not be empty".to_string(),
            ));
        }
        if matches!(self.parent.as_deref(), Some("")) {
            return Err(StreamError::MalformedRecord(format!(
                "feature {} has an empty parent ID",
                label
            )));
        }
        Ok(())
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What a record source hands to the assembly stage.
#[derive(PartialEq, Debug, Clone)]
pub enum RecordEvent {
    Feature(FeatureRecord),
    /// Every forward reference seen so far is final (the GFF3 `###` directive).
    Resolve,
}

impl From<FeatureRecord> for RecordEvent {
    fn from(record: FeatureRecord) -> Self {
        RecordEvent::Feature(record)
    }
}
