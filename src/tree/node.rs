/// Mutations attached to a node by the annotator, plus the text shown for
/// them when the tree is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAnnotation {
    pub mutations: Vec<String>,
    pub label: String,
}

impl NodeAnnotation {
    pub fn new(mutations: Vec<String>) -> Self {
        let label = mutations.join("\n");
        Self { mutations, label }
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Rewrites each label line, keeping the mutation list intact.
    pub fn relabel<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        self.label = self
            .mutations
            .iter()
            .map(|m| f(m))
            .collect::<Vec<_>>()
            .join("\n");
    }

    pub fn label_lines(&self) -> impl Iterator<Item = &str> {
        self.label.lines().filter(|line| !line.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    pub name: Option<String>,
    pub branch_length: Option<f64>,
    pub support: Option<f64>,
    pub children: Vec<TreeNode>,
    pub annotation: Option<NodeAnnotation>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn internal(children: Vec<TreeNode>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    pub fn with_branch_length(mut self, length: f64) -> Self {
        self.branch_length = Some(length);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A node without a name, or with an empty one.
    pub fn is_unnamed(&self) -> bool {
        self.name.as_deref().map_or(true, str::is_empty)
    }

    /// Nodes in preorder: each node before its children, children left to right.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Leaves below this node, in left-to-right order. A leaf yields itself.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.preorder().filter(|node| node.is_leaf())
    }

    pub fn leaf_names(&self) -> Vec<&str> {
        self.leaves().filter_map(|leaf| leaf.name.as_deref()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    pub fn has_branch_lengths(&self) -> bool {
        self.preorder().any(|node| node.branch_length.is_some())
    }

    /// Applies `f` to every node in preorder, parents before children.
    pub fn for_each_preorder_mut<F, E>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut TreeNode) -> Result<(), E>,
    {
        let mut stack: Vec<&mut TreeNode> = vec![self];
        while let Some(node) = stack.pop() {
            f(node)?;
            stack.extend(node.children.iter_mut().rev());
        }
        Ok(())
    }

    /// Rewrites the label of every annotated node with `f`.
    pub fn relabel_annotations<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        let mut stack: Vec<&mut TreeNode> = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(annotation) = node.annotation.as_mut() {
                annotation.relabel(&f);
            }
            stack.extend(node.children.iter_mut());
        }
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
