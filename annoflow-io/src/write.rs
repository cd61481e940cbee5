use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use annoflow_core::models::FeatureNode;

use crate::consts::{ABSENT, GFF3_VERSION_PRAGMA, ID_ATTRIBUTE, PARENT_ATTRIBUTE, RESOLVE_DIRECTIVE};
use crate::escape::{escape, escape_value};

pub trait Gff3Writer {
    ///
    /// Write the trees to disk as a GFF3 file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_gff3<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;

    ///
    /// Write the trees to disk as a gff3.gz file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_gff3_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;
}

impl Gff3Writer for [FeatureNode] {
    fn write_gff3<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let mut file = BufWriter::new(create_with_parents(path.as_ref())?);
        write_trees(&mut file, self)?;
        file.flush()
    }

    fn write_gff3_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let file = create_with_parents(path.as_ref())?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
        write_trees(&mut encoder, self)?;
        encoder.finish()?.flush()
    }
}

fn create_with_parents(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}

///
/// Render one feature as a GFF3 line, without the line terminator.
///
pub fn format_feature(node: &FeatureNode) -> String {
    let score = node
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| ABSENT.to_string());
    let phase = node
        .phase
        .map(|p| p.to_string())
        .unwrap_or_else(|| ABSENT.to_string());

    let mut attributes: Vec<String> = Vec::with_capacity(node.attributes.len() + 2);
    if let Some(id) = &node.id {
        attributes.push(format!("{}={}", ID_ATTRIBUTE, escape(id)));
    }
    if let Some(parent) = &node.parent {
        attributes.push(format!("{}={}", PARENT_ATTRIBUTE, escape(parent)));
    }
    for (key, value) in &node.attributes {
        attributes.push(format!("{}={}", escape(key), escape_value(value)));
    }
    let attributes = match attributes.is_empty() {
        true => ABSENT.to_string(),
        false => attributes.join(";"),
    };

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        escape(&node.seqid),
        escape(&node.source),
        escape(&node.feature_type),
        node.range.start,
        node.range.end,
        score,
        node.strand,
        phase,
        attributes
    )
}

///
/// Write a version pragma, then every tree parent-before-children, each
/// followed by `###`. Pseudo-parents are not written.
///
pub fn write_trees<W: Write + ?Sized>(writer: &mut W, trees: &[FeatureNode]) -> std::io::Result<()> {
    write_header(writer)?;
    for tree in trees {
        write_tree(writer, tree)?;
    }
    Ok(())
}

pub fn write_header<W: Write + ?Sized>(writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{}", GFF3_VERSION_PRAGMA)
}

/// Write a single tree and its closing `###`, for streaming output.
pub fn write_tree<W: Write + ?Sized>(writer: &mut W, tree: &FeatureNode) -> std::io::Result<()> {
    for node in tree.iter().filter(|node| !node.is_pseudo()) {
        writeln!(writer, "{}", format_feature(node))?;
    }
    writeln!(writer, "{}", RESOLVE_DIRECTIVE)
}
