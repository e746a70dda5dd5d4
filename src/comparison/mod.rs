pub mod loader;
pub mod mutations;
pub mod table;

pub use loader::{load_comparison_table, DEFAULT_SHEET_NAME};
pub use mutations::{get_common_mutations, get_common_mutations_with_limit, DEFAULT_MUTATION_LIMIT};
pub use table::{ComparisonTable, SampleSelection, Site};
