pub mod annotate;
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod error;
pub mod render;
pub mod tree;
mod utils;

pub use annotate::{add_common_mutations_to_tree, find_ortholog, SeenMutations, TreeAnnotator};
pub use comparison::{get_common_mutations, ComparisonTable};
pub use tree::{parse_newick, TreeNode};
