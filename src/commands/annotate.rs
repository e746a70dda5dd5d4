use crate::annotate::{OrthologMap, TreeAnnotator};
use crate::comparison::load_comparison_table;
use crate::config::Config;
use crate::render::{write_output, OutputFormat};
use crate::tree::parse_newick_file;
use crate::utils::progress_bar_builder::run_stage;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// What one annotation run produced.
#[derive(Debug, Clone)]
pub struct AnnotateSummary {
    pub sites: usize,
    pub samples: usize,
    pub leaves: usize,
    pub annotated_nodes: usize,
    pub mutations: usize,
    pub format: OutputFormat,
}

pub fn run(table_file: PathBuf, tree_file: PathBuf, output_file: PathBuf) -> Result<()> {
    let config = Config::load();
    let summary = annotate_tree(&table_file, &tree_file, &output_file, &config)?;

    println!("\nAnnotation Summary:");
    println!("Sites in comparison table: {}", summary.sites);
    println!("Samples in comparison table: {}", summary.samples);
    println!("Leaves in tree: {}", summary.leaves);
    println!("Annotated nodes: {}", summary.annotated_nodes);
    println!("Mutations attached: {}", summary.mutations);
    println!(
        "{} output written to: {}",
        summary.format.name(),
        output_file.display()
    );

    Ok(())
}

/// Loads the table and tree, annotates the tree and writes it to `output_path`.
pub fn annotate_tree(
    table_path: &Path,
    tree_path: &Path,
    output_path: &Path,
    config: &Config,
) -> Result<AnnotateSummary> {
    for input in [table_path, tree_path] {
        if !input.is_file() {
            bail!("Input file not found: {}", input.display());
        }
    }
    // Fail on an unknown output extension before doing any work.
    OutputFormat::from_path(output_path)?;

    let table = run_stage(
        "Loading comparison table...",
        || {
            load_comparison_table(table_path, &config.sheet_name, &config.sample_selection())
                .with_context(|| format!("Malformed comparison table {}", table_path.display()))
        },
        |table| {
            format!(
                "Loaded {} sites across {} samples",
                table.len(),
                table.samples().len()
            )
        },
    )?;

    let mut tree = run_stage(
        "Parsing tree...",
        || {
            parse_newick_file(tree_path)
                .with_context(|| format!("Malformed Newick tree {}", tree_path.display()))
        },
        |tree| format!("Parsed tree with {} leaves", tree.leaves().count()),
    )?;

    let orthologs = match &config.ortholog_map {
        Some(path) => Some(
            OrthologMap::load(path)
                .with_context(|| format!("Failed to read ortholog map {}", path.display()))?,
        ),
        None => None,
    };

    let seen = run_stage(
        "Annotating tree...",
        || {
            TreeAnnotator::new(&table)
                .with_reference_sample(config.reference_sample.as_str())
                .with_limit(config.max_mutations_per_node)
                .annotate(&mut tree)
                .with_context(|| {
                    format!(
                        "Tree {} does not match comparison table {}",
                        tree_path.display(),
                        table_path.display()
                    )
                })
        },
        |seen| format!("Attached {} mutations", seen.len()),
    )?;

    if let Some(orthologs) = &orthologs {
        tree.relabel_annotations(|text| orthologs.remap(text));
    }

    let format = run_stage(
        "Rendering tree...",
        || {
            write_output(&tree, output_path, &config.render)
                .with_context(|| format!("Failed to render {}", output_path.display()))
        },
        |format| format!("Wrote {} to {}", format.name(), output_path.display()),
    )?;

    Ok(AnnotateSummary {
        sites: table.len(),
        samples: table.samples().len(),
        leaves: tree.leaves().count(),
        annotated_nodes: tree
            .preorder()
            .filter(|node| node.annotation.as_ref().is_some_and(|a| !a.is_empty()))
            .count(),
        mutations: seen.len(),
        format,
    })
}
