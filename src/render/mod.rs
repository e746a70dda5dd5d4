pub mod json;
pub mod newick;
pub mod svg;

use crate::error::RenderError;
use crate::tree::node::TreeNode;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

pub use json::{to_json, AnnotatedTreeExport};
pub use newick::to_annotated_newick;
pub use svg::render_svg;

/// Drawing settings for SVG output, all in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_size: f64,
    pub line_height: f64,
    pub row_height: f64,
    pub tree_width: f64,
    pub margin: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            line_height: 13.0,
            row_height: 18.0,
            tree_width: 600.0,
            margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Svg,
    Newick,
    Json,
}

impl OutputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("nwk") | Some("newick") | Some("tree") => Ok(OutputFormat::Newick),
            Some("json") => Ok(OutputFormat::Json),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "SVG",
            OutputFormat::Newick => "Newick",
            OutputFormat::Json => "JSON",
        }
    }
}

pub fn render_tree(
    tree: &TreeNode,
    format: OutputFormat,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    match format {
        OutputFormat::Svg => Ok(render_svg(tree, config)),
        OutputFormat::Newick => {
            let mut newick = to_annotated_newick(tree);
            newick.push('\n');
            Ok(newick)
        }
        OutputFormat::Json => Ok(to_json(tree)?),
    }
}

/// Renders `tree` in the format implied by `path` and writes it there.
///
/// The content goes to a temporary file next to `path` first and is moved
/// into place once complete.
pub fn write_output(
    tree: &TreeNode,
    path: &Path,
    config: &RenderConfig,
) -> Result<OutputFormat, RenderError> {
    let format = OutputFormat::from_path(path)?;
    let content = render_tree(tree, format, config)?;

    let unwritable = |source: std::io::Error| RenderError::Unwritable {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = Builder::new()
        .prefix(".annotate-tree")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(unwritable)?;
    temp_file.write_all(content.as_bytes()).map_err(unwritable)?;
    temp_file.persist(path).map_err(|e| unwritable(e.error))?;

    Ok(format)
}
