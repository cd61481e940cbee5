use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

///
/// A pipeline as described in a TOML file: where to read, where to write and
/// which stages to chain, innermost first.
///
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
    pub ontology: Option<String>,
    #[serde(default)]
    pub drop_pseudo_parents: bool,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StageConfig {
    Duplicate {
        source_type: String,
        dest_type: String,
    },
    Interleave {
        outside_type: String,
        inter_type: String,
    },
    Typecheck,
    Stat,
}

fn default_output() -> String {
    "-".to_string()
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(text).context("Invalid pipeline config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config: {:?}", path))?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.input.is_empty() {
            bail!("Pipeline config needs a non-empty input");
        }
        let typechecks = self
            .stages
            .iter()
            .filter(|stage| **stage == StageConfig::Typecheck)
            .count();
        if typechecks == 0 && self.ontology.is_some() {
            log::warn!("An ontology is configured but no typecheck stage uses it");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_full_config() {
        let config = PipelineConfig::from_toml_str(
            r#"
            input = "genes.gff3"
            output = "out.gff3.gz"
            drop_pseudo_parents = true

            [[stages]]
            kind = "duplicate"
            source_type = "CDS"
            dest_type = "coding_region"

            [[stages]]
            kind = "interleave"
            outside_type = "exon"
            inter_type = "intron"

            [[stages]]
            kind = "stat"
            "#,
        )
        .unwrap();

        assert_eq!(config.output, "out.gff3.gz");
        assert!(config.drop_pseudo_parents);
        assert_eq!(config.ontology, None);
        assert_eq!(
            config.stages,
            vec![
                StageConfig::Duplicate {
                    source_type: "CDS".to_string(),
                    dest_type: "coding_region".to_string()
                },
                StageConfig::Interleave {
                    outside_type: "exon".to_string(),
                    inter_type: "intron".to_string()
                },
                StageConfig::Stat,
            ]
        );
    }

    #[rstest]
    fn test_defaults() {
        let config = PipelineConfig::from_toml_str("input = \"-\"").unwrap();
        assert_eq!(config.output, "-");
        assert!(config.stages.is_empty());
    }

    #[rstest]
    #[case("output = \"x\"")]
    #[case("input = \"\"")]
    #[case("input = \"a\"\n[[stages]]\nkind = \"sort\"")]
    #[case("input = \"a\"\n[[stages]]\nkind = \"duplicate\"\nsource_type = \"CDS\"")]
    fn test_invalid_configs(#[case] text: &str) {
        assert!(PipelineConfig::from_toml_str(text).is_err());
    }
}
