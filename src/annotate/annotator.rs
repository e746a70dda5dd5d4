use crate::comparison::mutations::{get_common_mutations_with_limit, DEFAULT_MUTATION_LIMIT};
use crate::comparison::table::ComparisonTable;
use crate::error::TableError;
use crate::tree::node::{NodeAnnotation, TreeNode};
use std::collections::HashSet;

/// Leaf name of the reference sample; never used as a grouping criterion.
pub const REFERENCE_SAMPLE: &str = "reference";

/// Mutation descriptions already attached somewhere in the tree, in the
/// order they were attached.
#[derive(Debug, Clone, Default)]
pub struct SeenMutations {
    order: Vec<String>,
    index: HashSet<String>,
}

impl SeenMutations {
    pub fn contains(&self, mutation: &str) -> bool {
        self.index.contains(mutation)
    }

    /// Returns false if the mutation was already recorded.
    pub fn insert(&mut self, mutation: String) -> bool {
        if self.index.insert(mutation.clone()) {
            self.order.push(mutation);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Attaches to every unnamed node the mutations shared by all of its leaves.
pub struct TreeAnnotator<'a> {
    table: &'a ComparisonTable,
    reference_sample: String,
    limit: usize,
}

impl<'a> TreeAnnotator<'a> {
    pub fn new(table: &'a ComparisonTable) -> Self {
        Self {
            table,
            reference_sample: REFERENCE_SAMPLE.to_string(),
            limit: DEFAULT_MUTATION_LIMIT,
        }
    }

    pub fn with_reference_sample(mut self, name: impl Into<String>) -> Self {
        self.reference_sample = name.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Walks the tree in preorder so a mutation lands on the shallowest node
    /// whose leaves all carry it. Named nodes (the sample leaves) are left
    /// alone. Returns the mutations attached during this walk.
    pub fn annotate(&self, tree: &mut TreeNode) -> Result<SeenMutations, TableError> {
        let mut seen = SeenMutations::default();

        tree.for_each_preorder_mut(|node| -> Result<(), TableError> {
            if !node.is_unnamed() {
                return Ok(());
            }

            let samples: Vec<String> = node
                .leaf_names()
                .into_iter()
                .filter(|name| !name.is_empty() && *name != self.reference_sample)
                .map(str::to_string)
                .collect();

            let mutations: Vec<String> =
                get_common_mutations_with_limit(self.table, &samples, self.limit)?
                    .into_iter()
                    .filter(|m| !seen.contains(m))
                    .filter(|m| !m.trim().is_empty())
                    .collect();

            for mutation in &mutations {
                seen.insert(mutation.clone());
            }

            node.annotation = Some(NodeAnnotation::new(mutations));
            Ok(())
        })?;

        Ok(seen)
    }
}

/// Annotates `tree` in place with the default reference name and limit.
pub fn add_common_mutations_to_tree(
    table: &ComparisonTable,
    tree: &mut TreeNode,
) -> Result<SeenMutations, TableError> {
    TreeAnnotator::new(table).annotate(tree)
}
