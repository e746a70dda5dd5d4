//! Newick reader.
//!
//! Grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= ['(' vertex {',' vertex} ')'] [label] [':' number]`
//!
//! Labels are unquoted (no whitespace or `()[]':;,`) or single-quoted with
//! `''` standing for a literal quote. `[...]` comments may appear wherever
//! whitespace may. Internal labels that read as numbers are support values.

use crate::error::NewickError;
use crate::tree::node::TreeNode;
use std::path::Path;

const DELIMITERS: &[u8] = b"()[]':;,";

pub fn parse_newick_file(path: &Path) -> Result<TreeNode, NewickError> {
    let content = std::fs::read_to_string(path)?;
    parse_newick(&content)
}

/// Parses a single Newick tree terminated by `;`.
pub fn parse_newick(input: &str) -> Result<TreeNode, NewickError> {
    let mut parser = NewickParser::new(input);
    parser.skip_comments_and_whitespace()?;
    if parser.is_eof() {
        return Err(NewickError::syntax(0, "empty input"));
    }

    let root = parser.parse_vertex()?;

    parser.skip_comments_and_whitespace()?;
    if !parser.consume_if(b';') {
        return Err(NewickError::syntax(
            parser.pos,
            format!("expected ';' at end of tree but found {:?}", parser.peek_char()),
        ));
    }

    parser.skip_comments_and_whitespace()?;
    if !parser.is_eof() {
        return Err(NewickError::syntax(
            parser.pos,
            "unexpected content after end of tree",
        ));
    }

    Ok(root)
}

struct NewickParser<'a> {
    bytes: &'a [u8],
    input: &'a str,
    pos: usize,
}

impl<'a> NewickParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            input,
            pos: 0,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_if(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_comments_and_whitespace(&mut self) -> Result<(), NewickError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'[') => {
                    let start = self.pos;
                    match self.bytes[self.pos..].iter().position(|&b| b == b']') {
                        Some(offset) => self.pos += offset + 1,
                        None => return Err(NewickError::syntax(start, "unterminated comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_vertex(&mut self) -> Result<TreeNode, NewickError> {
        self.skip_comments_and_whitespace()?;

        let children = if self.consume_if(b'(') {
            self.parse_children()?
        } else {
            Vec::new()
        };

        self.skip_comments_and_whitespace()?;
        let label = self.parse_label()?;

        self.skip_comments_and_whitespace()?;
        let branch_length = self.parse_branch_length()?;

        let mut node = TreeNode {
            children,
            branch_length,
            ..Default::default()
        };

        match label {
            Some(label) if !node.is_leaf() => match label.parse::<f64>() {
                Ok(support) => node.support = Some(support),
                Err(_) => node.name = Some(label),
            },
            label => node.name = label,
        }

        Ok(node)
    }

    /// Parses `vertex {',' vertex} ')'`, the opening `(` already consumed.
    fn parse_children(&mut self) -> Result<Vec<TreeNode>, NewickError> {
        let mut children = vec![self.parse_vertex()?];
        loop {
            self.skip_comments_and_whitespace()?;
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    children.push(self.parse_vertex()?);
                }
                Some(b')') => {
                    self.pos += 1;
                    return Ok(children);
                }
                _ => {
                    return Err(NewickError::syntax(
                        self.pos,
                        format!("expected ',' or ')' but found {:?}", self.peek_char()),
                    ))
                }
            }
        }
    }

    fn parse_label(&mut self) -> Result<Option<String>, NewickError> {
        if self.consume_if(b'\'') {
            return self.parse_quoted_label().map(Some);
        }

        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || DELIMITERS.contains(&b) {
                break;
            }
            self.pos += 1;
        }

        if self.pos == start {
            Ok(None)
        } else {
            Ok(Some(self.input[start..self.pos].to_string()))
        }
    }

    fn parse_quoted_label(&mut self) -> Result<String, NewickError> {
        let start = self.pos - 1;
        let mut label = String::new();
        let mut segment_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(NewickError::syntax(start, "unterminated quoted label")),
                Some(b'\'') => {
                    label.push_str(&self.input[segment_start..self.pos]);
                    self.pos += 1;
                    if self.consume_if(b'\'') {
                        label.push('\'');
                        segment_start = self.pos;
                    } else {
                        return Ok(label);
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_branch_length(&mut self) -> Result<Option<f64>, NewickError> {
        if !self.consume_if(b':') {
            return Ok(None);
        }
        self.skip_comments_and_whitespace()?;

        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || DELIMITERS.contains(&b) {
                break;
            }
            self.pos += 1;
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>().map(Some).map_err(|_| {
            NewickError::syntax(start, format!("invalid branch length {:?}", text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tree() {
        let tree = parse_newick("((A:1,B:2):0.5,C:3);").unwrap();
        assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
        assert!(tree.is_unnamed());
        assert_eq!(tree.children[0].branch_length, Some(0.5));
        assert_eq!(tree.children[0].children[1].branch_length, Some(2.0));
        assert_eq!(tree.branch_length, None);
    }

    #[test]
    fn test_multifurcation() {
        let tree = parse_newick("(A,B,C,(D,E,F));").unwrap();
        assert_eq!(tree.children.len(), 4);
        assert_eq!(tree.children[3].children.len(), 3);
    }

    #[test]
    fn test_internal_support_and_names() {
        let tree = parse_newick("((A,B)95:0.1,(C,D)clade_x);").unwrap();
        assert_eq!(tree.children[0].support, Some(95.0));
        assert!(tree.children[0].is_unnamed());
        assert_eq!(tree.children[1].name.as_deref(), Some("clade_x"));
    }

    #[test]
    fn test_quoted_labels_and_comments() {
        let tree = parse_newick("('sample 1':1[&rate=2],'it''s'  [comment] :2)\n;\n").unwrap();
        assert_eq!(tree.leaf_names(), vec!["sample 1", "it's"]);
        assert_eq!(tree.children[1].branch_length, Some(2.0));
    }

    #[test]
    fn test_hyphenated_leaf_names() {
        let tree = parse_newick("(reference,(sample-1,sample-2));").unwrap();
        assert_eq!(tree.leaf_names(), vec!["reference", "sample-1", "sample-2"]);
    }

    #[test]
    fn test_empty_leaves() {
        let tree = parse_newick("(,A);").unwrap();
        assert!(tree.children[0].is_unnamed());
        assert!(tree.children[0].is_leaf());
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_newick("(A,B)").unwrap_err();
        assert!(matches!(err, NewickError::Syntax { position: 5, .. }));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse_newick("((A,B);").is_err());
        assert!(parse_newick("(A,B));").is_err());
    }

    #[test]
    fn test_invalid_branch_length() {
        let err = parse_newick("(A:x,B);").unwrap_err();
        assert!(matches!(err, NewickError::Syntax { position: 3, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_newick("   ").is_err());
    }
}
