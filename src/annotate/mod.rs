pub mod annotator;
pub mod ortholog;

pub use annotator::{add_common_mutations_to_tree, SeenMutations, TreeAnnotator, REFERENCE_SAMPLE};
pub use ortholog::{find_ortholog, OrthologMap};
