pub mod newick;
pub mod node;

pub use newick::{parse_newick, parse_newick_file};
pub use node::{NodeAnnotation, Preorder, TreeNode};
