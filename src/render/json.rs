use crate::tree::node::TreeNode;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// JSON document written for `.json` outputs.
#[derive(Debug, Serialize)]
pub struct AnnotatedTreeExport<'a> {
    pub tool_version: &'static str,
    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub annotated_nodes: usize,
    pub mutation_count: usize,
    pub root: NodeExport<'a>,
}

#[derive(Debug, Serialize)]
pub struct NodeExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub mutations: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeExport<'a>>,
}

impl<'a> From<&'a TreeNode> for NodeExport<'a> {
    fn from(node: &'a TreeNode) -> Self {
        NodeExport {
            name: node.name.as_deref(),
            branch_length: node.branch_length,
            support: node.support,
            mutations: node
                .annotation
                .as_ref()
                .map_or(&[][..], |a| a.mutations.as_slice()),
            children: node.children.iter().map(NodeExport::from).collect(),
        }
    }
}

impl<'a> AnnotatedTreeExport<'a> {
    pub fn new(tree: &'a TreeNode) -> Self {
        let annotated: Vec<_> = tree
            .preorder()
            .filter_map(|node| node.annotation.as_ref())
            .filter(|a| !a.is_empty())
            .collect();

        AnnotatedTreeExport {
            tool_version: env!("CARGO_PKG_VERSION"),
            created_at: Utc::now(),
            annotated_nodes: annotated.len(),
            mutation_count: annotated.iter().map(|a| a.mutations.len()).sum(),
            root: NodeExport::from(tree),
        }
    }
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

pub fn to_json(tree: &TreeNode) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AnnotatedTreeExport::new(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::newick::parse_newick;
    use crate::tree::node::NodeAnnotation;

    #[test]
    fn test_export_shape() {
        let mut tree = parse_newick("((s-1:1,s-2:1):0.5,reference:1);").unwrap();
        tree.children[0].annotation = Some(NodeAnnotation::new(vec!["M1".into(), "M2".into()]));
        tree.annotation = Some(NodeAnnotation::default());

        let json: serde_json::Value = serde_json::from_str(&to_json(&tree).unwrap()).unwrap();
        assert_eq!(json["annotated_nodes"], 1);
        assert_eq!(json["mutation_count"], 2);
        assert!(json["root"].get("mutations").is_none());
        assert_eq!(json["root"]["children"][0]["mutations"][1], "M2");
        assert_eq!(json["root"]["children"][1]["name"], "reference");
        assert!(json["created_at"].as_str().is_some());
    }
}
