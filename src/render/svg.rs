use crate::render::RenderConfig;
use crate::tree::node::{NodeAnnotation, TreeNode};

const LABEL_GAP: f64 = 4.0;
// Offset of a branch label from the parent's vertical line.
const LABEL_INSET: f64 = 2.0;
const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Appends `text` with XML special characters replaced by entities.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

/// Streams the drawing into a string, one element per line.
struct SvgWriter {
    out: String,
}

impl SvgWriter {
    fn new(width: f64, height: f64, font_size: f64) -> Self {
        let mut out =
            String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" style=\"background:#ffffff\">\n",
            width.ceil(),
            height.ceil()
        ));
        out.push_str(&format!(
            "<g font-family=\"Arial\" font-size=\"{}\" stroke-linecap=\"square\">\n",
            font_size
        ));
        Self { out }
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.out.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#000000\" stroke-width=\"1\"/>\n",
            x1, y1, x2, y2
        ));
    }

    fn text(&mut self, x: f64, y: f64, text: &str) {
        self.out
            .push_str(&format!("<text x=\"{}\" y=\"{}\" fill=\"#000000\">", x, y));
        push_escaped(&mut self.out, text);
        self.out.push_str("</text>\n");
    }

    /// Multi-line label whose last line sits just above `y`.
    fn label(&mut self, x: f64, y: f64, anchor: &str, lines: &[&str], line_height: f64) {
        if lines.is_empty() {
            return;
        }

        let first_baseline = y - 3.0 - (lines.len() - 1) as f64 * line_height;
        self.out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"{}\" fill=\"#aa0000\">",
            x, first_baseline, anchor
        ));
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                self.out.push_str(&format!("<tspan x=\"{}\">", x));
            } else {
                self.out
                    .push_str(&format!("<tspan x=\"{}\" dy=\"{}\">", x, line_height));
            }
            push_escaped(&mut self.out, line);
            self.out.push_str("</tspan>");
        }
        self.out.push_str("</text>\n");
    }

    fn finish(mut self) -> String {
        self.out.push_str("</g>\n</svg>\n");
        self.out
    }
}

/// Position of a node in the drawing, indexed by preorder number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

/// Rectangular layout. Nodes are numbered in preorder so every subtree owns
/// a contiguous index range, which lets a subtree be shifted down in one go.
struct TreeLayout {
    points: Vec<Point>,
    parents: Vec<Option<usize>>,
    /// First and last child of each internal node.
    child_span: Vec<Option<(usize, usize)>>,
    height: f64,
    max_depth: f64,
}

struct LayoutBuilder<'a> {
    config: &'a RenderConfig,
    use_lengths: bool,
    points: Vec<Point>,
    parents: Vec<Option<usize>>,
    child_span: Vec<Option<(usize, usize)>>,
    cursor: f64,
    max_depth: f64,
}

impl<'a> LayoutBuilder<'a> {
    fn label_height(&self, node: &TreeNode) -> f64 {
        let lines = node
            .annotation
            .as_ref()
            .map_or(0, |a| a.label_lines().count());
        lines as f64 * self.config.line_height
    }

    fn branch(&self, node: &TreeNode) -> f64 {
        if self.use_lengths {
            node.branch_length.unwrap_or(0.0).max(0.0)
        } else {
            1.0
        }
    }

    /// Places `node` (preorder number `id`) and its subtree; returns the next
    /// free preorder number.
    fn place(&mut self, node: &TreeNode, id: usize, depth: f64) -> usize {
        let start = self.cursor;
        let label_height = self.label_height(node);

        if node.is_leaf() {
            let y = start + label_height + self.config.row_height / 2.0;
            self.cursor = start + label_height + self.config.row_height;
            self.points[id] = Point { x: depth, y };
            self.max_depth = self.max_depth.max(depth);
            return id + 1;
        }

        let mut next = id + 1;
        let first_child = next;
        let mut last_child = next;
        for child in &node.children {
            last_child = next;
            self.parents[next] = Some(id);
            next = self.place(child, next, depth + self.branch(child));
        }
        self.child_span[id] = Some((first_child, last_child));

        let mut y = (self.points[first_child].y + self.points[last_child].y) / 2.0;
        if y - label_height < start {
            let delta = start + label_height - y;
            for point in &mut self.points[id + 1..next] {
                point.y += delta;
            }
            self.cursor += delta;
            y += delta;
        }

        self.points[id] = Point { x: depth, y };
        next
    }
}

impl TreeLayout {
    fn build(tree: &TreeNode, config: &RenderConfig) -> Self {
        let mut builder = LayoutBuilder {
            config,
            use_lengths: tree.has_branch_lengths(),
            points: vec![Point::default(); tree.node_count()],
            parents: vec![None; tree.node_count()],
            child_span: vec![None; tree.node_count()],
            cursor: 0.0,
            max_depth: 0.0,
        };
        builder.place(tree, 0, 0.0);

        TreeLayout {
            points: builder.points,
            parents: builder.parents,
            child_span: builder.child_span,
            height: builder.cursor,
            max_depth: builder.max_depth,
        }
    }
}

fn widest_line(annotation: Option<&NodeAnnotation>) -> Option<usize> {
    annotation.and_then(|a| a.label_lines().map(|line| line.chars().count()).max())
}

/// Draws the tree as a rectangular phylogram. Each node's annotation starts
/// at its parent and runs right along the top of the branch into the node.
pub fn render_svg(tree: &TreeNode, config: &RenderConfig) -> String {
    let layout = TreeLayout::build(tree, config);
    let margin = config.margin;
    let scale = if layout.max_depth > 0.0 {
        config.tree_width / layout.max_depth
    } else {
        0.0
    };
    let text_width = |chars: usize| chars as f64 * config.font_size * CHAR_WIDTH_RATIO;
    // The root label has no branch to sit on; it goes left of the root.
    let root_pad = widest_line(tree.annotation.as_ref()).map_or(0.0, |chars| {
        text_width(chars) + LABEL_GAP
    });
    let px = |id: usize| {
        let point = layout.points[id];
        (margin + root_pad + point.x * scale, margin + point.y)
    };

    let right_edge = tree
        .preorder()
        .enumerate()
        .map(|(id, node)| {
            let (x, _) = px(id);
            let name_edge = match node.name.as_deref() {
                Some(name) if node.is_leaf() => x + LABEL_GAP + text_width(name.chars().count()),
                _ => x,
            };
            let label_edge = match (layout.parents[id], widest_line(node.annotation.as_ref())) {
                (Some(parent), Some(chars)) => px(parent).0 + LABEL_INSET + text_width(chars),
                _ => x,
            };
            name_edge.max(label_edge)
        })
        .fold(margin + root_pad, f64::max);

    let mut svg = SvgWriter::new(
        right_edge + margin,
        layout.height + margin * 2.0,
        config.font_size,
    );

    for (id, node) in tree.preorder().enumerate() {
        let (x, y) = px(id);
        let lines: Vec<&str> = node
            .annotation
            .as_ref()
            .map(|a| a.label_lines().collect())
            .unwrap_or_default();

        match layout.parents[id] {
            Some(parent) => {
                let (parent_x, _) = px(parent);
                svg.line(parent_x, y, x, y);
                svg.label(parent_x + LABEL_INSET, y, "start", &lines, config.line_height);
            }
            None => svg.label(x - LABEL_GAP, y, "end", &lines, config.line_height),
        }

        if let Some((first, last)) = layout.child_span[id] {
            svg.line(x, px(first).1, x, px(last).1);
        }

        if node.is_leaf() {
            if let Some(name) = node.name.as_deref() {
                svg.text(x + LABEL_GAP, y + config.font_size / 3.0, name);
            }
        }
    }

    svg.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::newick::parse_newick;

    /// Value of the first ` name="..."` attribute on the line containing `marker`.
    fn attribute(svg: &str, marker: &str, name: &str) -> f64 {
        let line = svg.lines().find(|line| line.contains(marker)).unwrap();
        let key = format!(" {}=\"", name);
        let start = line.find(&key).unwrap() + key.len();
        let end = start + line[start..].find('"').unwrap();
        line[start..end].parse().unwrap()
    }

    #[test]
    fn test_push_escaped() {
        let mut out = String::from("x:");
        push_escaped(&mut out, "a<b & \"c\" 'd'");
        assert_eq!(out, "x:a&lt;b &amp; &quot;c&quot; &apos;d&apos;");
    }

    #[test]
    fn test_writer_elements() {
        let mut svg = SvgWriter::new(100.4, 50.0, 11.0);
        svg.line(1.0, 2.5, 3.0, 4.0);
        svg.text(5.0, 6.0, "s-1");
        let svg = svg.finish();

        assert!(svg.contains("width=\"101\" height=\"50\""));
        assert!(svg.contains("<line x1=\"1\" y1=\"2.5\" x2=\"3\" y2=\"4\""));
        assert!(svg.contains("<text x=\"5\" y=\"6\" fill=\"#000000\">s-1</text>"));
        assert!(svg.ends_with("</g>\n</svg>\n"));
    }

    #[test]
    fn test_branch_label_stays_on_canvas() {
        let mut tree = parse_newick("((s-1:0.01,s-2:0.01):0.01,s-3:1);").unwrap();
        let description = "gyrA_S83L_and_a_much_longer_description_xy";
        assert_eq!(description.len(), 42);
        tree.children[0].annotation = Some(NodeAnnotation::new(vec![description.into()]));
        let config = RenderConfig::default();

        let svg = render_svg(&tree, &config);
        let label_x = attribute(&svg, description, "x");
        let width = attribute(&svg, "<svg ", "width");
        let label_width = 42.0 * config.font_size * CHAR_WIDTH_RATIO;

        assert!(svg.contains("text-anchor=\"start\""));
        assert!(label_x >= 0.0);
        assert!(label_x + label_width <= width);
    }

    #[test]
    fn test_root_label_stays_on_canvas() {
        let mut tree = parse_newick("(s-1:1,s-2:1);").unwrap();
        tree.annotation = Some(NodeAnnotation::new(vec!["core_mutation_1".into()]));
        let config = RenderConfig::default();

        let svg = render_svg(&tree, &config);
        let label_x = attribute(&svg, "core_mutation_1", "x");

        assert!(svg.contains("text-anchor=\"end\""));
        assert!(label_x - 15.0 * config.font_size * CHAR_WIDTH_RATIO >= 0.0);
    }

    #[test]
    fn test_layout_leaves_in_order() {
        let tree = parse_newick("((A:1,B:1):1,C:2);").unwrap();
        let config = RenderConfig::default();
        let layout = TreeLayout::build(&tree, &config);

        // preorder: root, (A,B), A, B, C
        let ys: Vec<f64> = layout.points.iter().map(|p| p.y).collect();
        assert!(ys[2] < ys[3] && ys[3] < ys[4]);
        assert_eq!(ys[1], (ys[2] + ys[3]) / 2.0);
        assert_eq!(layout.points[4].x, 2.0);
        assert_eq!(layout.max_depth, 2.0);
        assert_eq!(layout.height, 3.0 * config.row_height);
    }

    #[test]
    fn test_layout_reserves_label_space() {
        let mut tree = parse_newick("(A,(B,C));").unwrap();
        tree.children[1].annotation = Some(NodeAnnotation::new(
            (0..6).map(|i| format!("M{}", i)).collect(),
        ));
        let config = RenderConfig::default();
        let layout = TreeLayout::build(&tree, &config);

        // preorder: root, A, (B,C), B, C
        let a_bottom = config.row_height;
        let label_top = layout.points[2].y - 6.0 * config.line_height;
        assert!(label_top >= a_bottom);
    }

    #[test]
    fn test_render_contains_names_and_labels() {
        let mut tree = parse_newick("(sample-1,sample-2);").unwrap();
        tree.annotation = Some(NodeAnnotation::new(vec!["gyrA <S83L>".into(), "X2".into()]));

        let svg = render_svg(&tree, &RenderConfig::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(">sample-1</text>"));
        assert!(svg.contains(">sample-2</text>"));
        assert!(svg.contains("gyrA &lt;S83L&gt;"));
        assert!(svg.contains(">X2</tspan>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
