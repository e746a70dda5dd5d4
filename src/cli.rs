use clap::Parser;
use std::path::PathBuf;

/// Annotate a phylogenetic tree with the mutations shared by each clade.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The comparison table generated by the isolate parsers (Excel workbook, or a CSV/TSV export)
    pub filename: PathBuf,

    /// A pre-generated tree in Newick format
    pub tree: PathBuf,

    /// Output file; the format follows the extension (.svg, .nwk/.newick/.tree, .json)
    pub output: PathBuf,
}
