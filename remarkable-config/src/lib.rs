//! Shared configuration loader for the remarkable toolchain.
//!
//! `defaults/remarkable.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`RemarkableConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use remarkable_parser::remarkable::options::PipelineOptions;
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/remarkable.default.toml");

/// Top-level configuration consumed by remarkable applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RemarkableConfig {
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

/// Mirrors the knobs of the tree assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    pub retain_space: bool,
    pub allow_html: bool,
    pub name_cycles: bool,
}

impl PipelineConfig {
    /// Assembler options with these settings and no content transforms.
    pub fn to_options(&self) -> PipelineOptions {
        PipelineOptions::default()
            .with_retain_space(self.retain_space)
            .with_allow_html(self.allow_html)
            .with_name_cycles(self.name_cycles)
    }
}

impl From<PipelineConfig> for PipelineOptions {
    fn from(config: PipelineConfig) -> Self {
        config.to_options()
    }
}

/// Controls what the CLI prints.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
    pub stage: Stage,
}

/// A pipeline stage whose output can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// The source text
    Markdown,
    /// The tokenizer output
    Tokens,
    /// Tokens with metadata nodes inserted
    Resolved,
    /// The assembled document tree
    Tree,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Markdown, Stage::Tokens, Stage::Resolved, Stage::Tree];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Markdown => "markdown",
            Stage::Tokens => "tokens",
            Stage::Resolved => "resolved",
            Stage::Tree => "tree",
        }
    }

    pub fn from_name(name: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|stage| stage.name() == name)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RemarkableConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RemarkableConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use remarkable_parser::remarkable::graph::CyclePolicy;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.pipeline.retain_space);
        assert!(!config.pipeline.allow_html);
        assert!(config.pipeline.name_cycles);
        assert!(config.output.pretty);
        assert_eq!(config.output.stage, Stage::Tree);
    }

    #[test]
    fn defaults_match_pipeline_defaults() {
        let options = load_defaults().unwrap().pipeline.to_options();
        let defaults = PipelineOptions::default();
        assert_eq!(options.retain_space, defaults.retain_space);
        assert_eq!(options.allow_html, defaults.allow_html);
        assert_eq!(options.name_cycles, defaults.name_cycles);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.stage", "resolved")
            .expect("override to apply")
            .set_override("pipeline.name_cycles", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.stage, Stage::Resolved);
        assert_eq!(
            PipelineOptions::from(config.pipeline).cycle_policy(),
            CyclePolicy::Delete
        );
    }

    #[test]
    fn layers_user_files() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pipeline]\nallow_html = true").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert!(config.pipeline.allow_html);
        assert!(config.pipeline.name_cycles);
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new().with_file("no/such/remarkable.toml").build().is_err());
        assert!(Loader::new()
            .with_optional_file("no/such/remarkable.toml")
            .build()
            .is_ok());
    }

    #[test]
    fn rejects_unknown_stages() {
        let result = Loader::new()
            .set_override("output.stage", "html")
            .unwrap()
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn stage_names() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_name(stage.name()), Some(stage));
        }
        assert_eq!(Stage::from_name("ast"), None);
    }
}
