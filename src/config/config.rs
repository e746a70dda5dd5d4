use crate::annotate::REFERENCE_SAMPLE;
use crate::comparison::{SampleSelection, DEFAULT_MUTATION_LIMIT, DEFAULT_SHEET_NAME};
use crate::render::RenderConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_max_mutations_per_node")]
    pub max_mutations_per_node: usize,
    #[serde(default = "default_reference_sample")]
    pub reference_sample: String,
    /// Explicit sample columns; when unset every column containing `-` is a sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_columns: Option<Vec<String>>,
    /// Locus tag to ortholog table used to relabel the drawn annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ortholog_map: Option<PathBuf>,
    #[serde(default)]
    pub render: RenderConfig,
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

fn default_max_mutations_per_node() -> usize {
    DEFAULT_MUTATION_LIMIT
}

fn default_reference_sample() -> String {
    REFERENCE_SAMPLE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            max_mutations_per_node: default_max_mutations_per_node(),
            reference_sample: default_reference_sample(),
            sample_columns: None,
            ortholog_map: None,
            render: RenderConfig::default(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "isolate-tools", "isolate-tree-tools")
}

impl Config {
    /// Location of `config.toml`, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        Self::path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Ignoring invalid config {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn sample_selection(&self) -> SampleSelection {
        SampleSelection::from_columns(self.sample_columns.as_deref())
    }
}
