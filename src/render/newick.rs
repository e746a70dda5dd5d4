use crate::tree::node::TreeNode;

const NEEDS_QUOTES: &[char] = &['(', ')', '[', ']', '\'', ':', ';', ','];

/// Newick string of the annotated tree, closing semicolon included.
///
/// Annotations are written as BEAST-style comments after the node label,
/// e.g. `(A,B)[&mutations={"gyrA S83L","parC"}]:0.1`. Square brackets and
/// double quotes inside descriptions become parentheses and single quotes so
/// the comment stays well formed.
pub fn to_annotated_newick(tree: &TreeNode) -> String {
    let mut newick = String::new();
    build_newick(tree, &mut newick, true);
    newick.push(';');
    newick
}

fn build_newick(node: &TreeNode, newick: &mut String, is_root: bool) {
    if !node.is_leaf() {
        newick.push('(');
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            build_newick(child, newick, false);
        }
        newick.push(')');
    }

    match (&node.name, node.support) {
        (Some(name), _) if !name.is_empty() => newick.push_str(&escape_label(name)),
        (_, Some(support)) if !node.is_leaf() => newick.push_str(&support.to_string()),
        _ => {}
    }

    if let Some(annotation) = node.annotation.as_ref().filter(|a| !a.is_empty()) {
        let values: Vec<String> = annotation
            .mutations
            .iter()
            .map(|m| format!("\"{}\"", sanitize_comment_value(m)))
            .collect();
        newick.push_str("[&mutations={");
        newick.push_str(&values.join(","));
        newick.push_str("}]");
    }

    if let Some(length) = node.branch_length {
        if !is_root || length != 0.0 {
            newick.push(':');
            newick.push_str(&length.to_string());
        }
    }
}

fn escape_label(label: &str) -> String {
    if label.chars().any(|c| c.is_whitespace() || NEEDS_QUOTES.contains(&c)) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

fn sanitize_comment_value(value: &str) -> String {
    value
        .replace('[', "(")
        .replace(']', ")")
        .replace('"', "'")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::newick::parse_newick;
    use crate::tree::node::NodeAnnotation;

    #[test]
    fn test_plain_tree() {
        let tree = parse_newick("((A:1,B:2):0.5,C:3);").unwrap();
        assert_eq!(to_annotated_newick(&tree), "((A:1,B:2):0.5,C:3);");
    }

    #[test]
    fn test_annotations_and_quoting() {
        let mut tree = parse_newick("('sample 1',B)95;").unwrap();
        tree.annotation = Some(NodeAnnotation::new(vec![
            "gyrA [S83L]".to_string(),
            "say \"hi\"".to_string(),
        ]));
        assert_eq!(
            to_annotated_newick(&tree),
            "('sample 1',B)95[&mutations={\"gyrA (S83L)\",\"say 'hi'\"}];"
        );
    }

    #[test]
    fn test_output_parses_back() {
        let mut tree = parse_newick("((s-1:0.1,'it''s':0.2):0.3,reference:1);").unwrap();
        tree.children[0].annotation = Some(NodeAnnotation::new(vec!["M1".into()]));

        let reparsed = parse_newick(&to_annotated_newick(&tree)).unwrap();
        assert_eq!(reparsed.leaf_names(), tree.leaf_names());
        assert_eq!(reparsed.children[0].branch_length, Some(0.3));
        assert!(reparsed.children[0].annotation.is_none());
    }
}
