use std::io::{BufRead, Lines};
use std::path::Path;

use log::debug;

use annoflow_core::errors::StreamError;
use annoflow_core::models::{FeatureRecord, Range, RecordEvent, Strand};
use annoflow_core::utils::get_dynamic_reader;

use crate::consts::{
    ABSENT, FASTA_DIRECTIVE, GFF3_COLUMNS, ID_ATTRIBUTE, PARENT_ATTRIBUTE, RESOLVE_DIRECTIVE,
};
use crate::escape::unescape;

///
/// Gff3Reader struct, decodes GFF3 lines into record events for the assembly
/// stage.
///
/// Comments and pragmas are skipped, `###` becomes [RecordEvent::Resolve] and
/// reading stops at `##FASTA`. After the first error the reader is exhausted.
///
pub struct Gff3Reader<R> {
    lines: Lines<R>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> Gff3Reader<R> {
    pub fn new(reader: R) -> Self {
        Gff3Reader {
            lines: reader.lines(),
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn read_event(&mut self) -> Option<Result<RecordEvent, StreamError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            if line == RESOLVE_DIRECTIVE {
                return Some(Ok(RecordEvent::Resolve));
            }
            if line.starts_with(FASTA_DIRECTIVE) {
                debug!("Reached {} on line {}, stopping", FASTA_DIRECTIVE, self.line_no);
                return None;
            }
            if line.starts_with('#') {
                continue;
            }

            return Some(parse_feature_line(line).map(RecordEvent::Feature).map_err(
                |message| StreamError::MalformedLine {
                    line: self.line_no,
                    message,
                },
            ));
        }
    }
}

impl Gff3Reader<std::io::BufReader<Box<dyn std::io::Read>>> {
    ///
    /// Open a GFF3 file, gzip'd or not.
    ///
    /// # Arguments
    /// - path: path to the `.gff3` or `.gff3.gz` file
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Gff3Reader::new(get_dynamic_reader(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for Gff3Reader<R> {
    type Item = Result<RecordEvent, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let event = self.read_event();
        if !matches!(event, Some(Ok(_))) {
            self.done = true;
        }
        event
    }
}

fn parse_optional<T: std::str::FromStr>(column: &str, name: &str) -> Result<Option<T>, String> {
    if column == ABSENT {
        return Ok(None);
    }
    column
        .parse::<T>()
        .map(Some)
        .map_err(|_| format!("invalid {} '{}'", name, column))
}

///
/// Decode one nine-column feature line.
///
pub fn parse_feature_line(line: &str) -> Result<FeatureRecord, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != GFF3_COLUMNS {
        return Err(format!(
            "expected {} tab-separated columns, found {}",
            GFF3_COLUMNS,
            fields.len()
        ));
    }

    let start: u64 = fields[3]
        .parse()
        .map_err(|_| format!("invalid start '{}'", fields[3]))?;
    let end: u64 = fields[4]
        .parse()
        .map_err(|_| format!("invalid end '{}'", fields[4]))?;
    let range = Range::new(start, end).map_err(|e| e.to_string())?;

    let strand = fields[6]
        .parse::<Strand>()
        .map_err(|_| format!("invalid strand '{}'", fields[6]))?;
    let score = parse_optional::<f32>(fields[5], "score")?;
    let phase = parse_optional::<u8>(fields[7], "phase")?;
    if phase.is_some_and(|p| p > 2) {
        return Err(format!("invalid phase '{}'", fields[7]));
    }

    let mut record = FeatureRecord::new(
        None,
        None,
        &unescape(fields[0]),
        &unescape(fields[2]),
        range,
    );
    record.source = unescape(fields[1]);
    record.score = score;
    record.strand = strand;
    record.phase = phase;

    if fields[8] != ABSENT {
        for pair in fields[8].split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(format!("attribute '{}' has no value", pair));
            };
            let key = unescape(key);
            match key.as_str() {
                ID_ATTRIBUTE => {
                    if record.id.is_some() {
                        return Err("more than one ID attribute".to_string());
                    }
                    record.id = Some(unescape(value));
                }
                PARENT_ATTRIBUTE => {
                    if record.parent.is_some() || value.contains(',') {
                        return Err(format!(
                            "feature declares more than one parent ({})",
                            value
                        ));
                    }
                    record.parent = Some(unescape(value));
                }
                _ => record.attributes.push((key, unescape(value))),
            }
        }
    }

    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}
