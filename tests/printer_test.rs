//! Tests for text, DOT and box-drawing rendering

use std::fmt;
use std::fs;
use std::path::Path;

use rstest::{fixture, rstest};

use astree::application::{
    render_dot, render_text, to_term_tree, write_text, GraphStyle, TextStyle, TreeDocument,
    TreeStats,
};
use astree::domain::{Ast, NodeId, NodeKind, Payload};
use astree::util::testing;

const COUNTDOWN: &str = "tests/resources/trees/countdown.toml";

#[fixture]
fn plus() -> (Ast, NodeId) {
    testing::init_test_setup();
    let mut ast = Ast::new();
    let two = ast.create(NodeKind::Num, Payload::Int(2)).unwrap();
    let three = ast.create(NodeKind::Num, Payload::Int(3)).unwrap();
    let root = ast.subtree(NodeKind::Plus, [two, three]).unwrap();
    (ast, root)
}

fn countdown() -> (Ast, NodeId) {
    let path = Path::new(COUNTDOWN);
    let doc = TreeDocument::load(path).unwrap();
    let mut ast = Ast::new();
    let root = doc.build(&mut ast, path).unwrap();
    (ast, root)
}

/// `depth` nested `BLOCK` nodes, returning the outermost.
fn chain(ast: &mut Ast, depth: usize) -> NodeId {
    let mut top = ast.create(NodeKind::Block, Payload::None).unwrap();
    for _ in 1..depth {
        top = ast.subtree(NodeKind::Block, [top]).unwrap();
    }
    top
}

/// Counts lines and the longest line without keeping the text.
#[derive(Default)]
struct LineMeter {
    lines: usize,
    current: usize,
    longest: usize,
}

impl fmt::Write for LineMeter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.lines += 1;
                self.current = 0;
            }
            self.current += part.len();
            self.longest = self.longest.max(self.current);
        }
        Ok(())
    }
}

/// `if (x < 10) write "big" else output x`, leaves created in the given order.
fn if_tree(ast: &mut Ast, reversed: bool) -> NodeId {
    let leaves = [
        (NodeKind::VarUse, Payload::Symbol(1)),
        (NodeKind::Num, Payload::Int(10)),
        (NodeKind::Str, Payload::Text("big".into())),
        (NodeKind::VarUse, Payload::Symbol(1)),
    ];
    let order: Vec<usize> = if reversed {
        vec![3, 2, 1, 0]
    } else {
        vec![0, 1, 2, 3]
    };
    let mut ids = [None; 4];
    for i in order {
        let (kind, payload) = leaves[i].clone();
        ids[i] = Some(ast.create(kind, payload).unwrap());
    }
    let [x, ten, big, y] = ids.map(|id| id.unwrap());

    let cond = ast.subtree(NodeKind::Lt, [x, ten]).unwrap();
    let write = ast.subtree(NodeKind::Write, [big]).unwrap();
    let output = ast.subtree(NodeKind::Output, [y]).unwrap();
    ast.subtree(NodeKind::If, [cond, write, output]).unwrap()
}

// ============================================================
// Text
// ============================================================

#[rstest]
fn given_plus_of_two_numbers_when_printing_text_then_three_indented_lines(
    plus: (Ast, NodeId),
) {
    let (ast, root) = plus;

    let text = render_text(&ast, root, &TextStyle::default()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["PLUS", "    NUM 2", "    NUM 3"]);
    assert_eq!(ast.child_count(root).unwrap(), 2);
}

#[rstest]
fn given_custom_style_when_printing_text_then_indent_and_payload_follow_style(
    plus: (Ast, NodeId),
) {
    let (ast, root) = plus;
    let style = TextStyle {
        indent: 2,
        show_payload: false,
    };

    let text = render_text(&ast, root, &style).unwrap();

    assert_eq!(text, "PLUS\n  NUM\n  NUM\n");
}

#[rstest]
fn given_string_sink_when_writing_text_then_appends_to_existing_content(plus: (Ast, NodeId)) {
    let (ast, root) = plus;
    let mut out = String::from("# tree\n");

    write_text(&ast, root, &TextStyle::default(), &mut out).unwrap();

    assert!(out.starts_with("# tree\nPLUS\n"));
}

#[test]
fn given_very_deep_chain_when_printing_text_then_every_level_is_indented() {
    testing::init_test_setup();
    let mut ast = Ast::new();
    let root = chain(&mut ast, 20_000);
    let mut meter = LineMeter::default();

    write_text(&ast, root, &TextStyle::default(), &mut meter).unwrap();

    assert_eq!(meter.lines, 20_000);
    assert_eq!(meter.longest, 19_999 * 4 + "BLOCK".len());
}

#[rstest]
fn given_indent_wider_than_format_width_limit_when_printing_text_then_pads_fully(
    plus: (Ast, NodeId),
) {
    let (ast, root) = plus;
    let style = TextStyle {
        indent: 70_000,
        show_payload: true,
    };

    let text = render_text(&ast, root, &style).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].len(), 70_000 + "NUM 2".len());
    assert!(lines[1].starts_with(&" ".repeat(70_000)));
    assert!(lines[1].ends_with(" NUM 2"));
}

#[test]
fn given_countdown_document_when_printing_text_then_matches_golden_file() {
    testing::init_test_setup();
    let (ast, root) = countdown();
    let expected = fs::read_to_string("tests/resources/trees/countdown.txt").unwrap();

    let text = render_text(&ast, root, &TextStyle::default()).unwrap();

    assert_eq!(text, expected);
}

// ============================================================
// DOT
// ============================================================

#[test]
fn given_countdown_document_when_printing_dot_then_matches_golden_file() {
    testing::init_test_setup();
    let (ast, root) = countdown();
    let expected = fs::read_to_string("tests/resources/trees/countdown.dot").unwrap();

    let dot = render_dot(&ast, root, &GraphStyle::default()).unwrap();

    assert_eq!(dot, expected);
}

#[test]
fn given_countdown_document_when_printing_dot_then_one_declaration_per_node_and_edge_per_link() {
    testing::init_test_setup();
    let (ast, root) = countdown();
    let stats = TreeStats::collect(&ast, root).unwrap();
    let child_links: usize = ast
        .preorder(root)
        .unwrap()
        .map(|v| v.node.child_count())
        .sum();

    let dot = render_dot(&ast, root, &GraphStyle::default()).unwrap();

    let edges = dot.lines().filter(|l| l.contains(" -> ")).count();
    let declarations = dot.lines().filter(|l| l.contains("[label=")).count();
    assert_eq!(edges, child_links);
    assert_eq!(declarations, stats.nodes);
    assert!(dot.starts_with("digraph \"ast\" {\n"));
    assert!(dot.ends_with("}\n"));
}

#[rstest]
fn given_graph_style_when_printing_dot_then_header_uses_it(plus: (Ast, NodeId)) {
    let (ast, root) = plus;
    let style = GraphStyle {
        name: "expr".into(),
        node_shape: "ellipse".into(),
        rankdir: "LR".into(),
    };

    let dot = render_dot(&ast, root, &style).unwrap();

    assert_eq!(
        dot,
        "digraph \"expr\" {\n    rankdir=LR;\n    node [shape=ellipse];\n    n0 [label=\"PLUS\"];\n    n1 [label=\"NUM 2\"];\n    n2 [label=\"NUM 3\"];\n    n0 -> n1;\n    n0 -> n2;\n}\n"
    );
}

#[test]
fn given_text_with_quotes_when_printing_dot_then_label_is_escaped() {
    let mut ast = Ast::new();
    let s = ast
        .create(NodeKind::Str, Payload::Text("say \"hi\"".into()))
        .unwrap();

    let dot = render_dot(&ast, s, &GraphStyle::default()).unwrap();

    assert!(dot.contains(r#"n0 [label="STRING \"say \\\"hi\\\"\""];"#), "{}", dot);
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn given_identical_trees_in_different_slots_when_printing_then_output_is_byte_identical() {
    let mut first = Ast::new();
    let a = if_tree(&mut first, false);

    let mut second = Ast::new();
    let junk = second.create(NodeKind::Block, Payload::None).unwrap();
    let kept = second.create(NodeKind::Block, Payload::None).unwrap();
    second.free_tree(junk).unwrap();
    let b = if_tree(&mut second, true);
    assert!(second.contains(kept));

    assert_eq!(
        render_text(&first, a, &TextStyle::default()).unwrap(),
        render_text(&second, b, &TextStyle::default()).unwrap()
    );
    assert_eq!(
        render_dot(&first, a, &GraphStyle::default()).unwrap(),
        render_dot(&second, b, &GraphStyle::default()).unwrap()
    );
}

// ============================================================
// Box-drawing view
// ============================================================

#[rstest]
fn given_plus_when_converting_to_term_tree_then_children_are_branches(plus: (Ast, NodeId)) {
    let (ast, root) = plus;

    let rendered = to_term_tree(&ast, root, true).unwrap().to_string();

    assert!(rendered.starts_with("PLUS\n"));
    assert!(rendered.contains("├── NUM 2"));
    assert!(rendered.contains("└── NUM 3"));
}

#[test]
fn given_deep_chain_when_converting_to_term_tree_then_keeps_every_level() {
    let mut ast = Ast::new();
    let root = chain(&mut ast, 1_000);

    let tree = to_term_tree(&ast, root, true).unwrap();

    let mut levels = 1;
    let mut current = &tree;
    while let Some(next) = current.leaves.first() {
        assert_eq!(current.leaves.len(), 1);
        current = next;
        levels += 1;
    }
    assert_eq!(levels, 1_000);
    assert_eq!(current.root, "BLOCK");
}

#[test]
fn given_countdown_document_when_converting_to_term_tree_then_matches_text_order() {
    let (ast, root) = countdown();

    let rendered = to_term_tree(&ast, root, true).unwrap().to_string();
    let text = render_text(&ast, root, &TextStyle::default()).unwrap();

    let labels: Vec<&str> = text.lines().map(str::trim_start).collect();
    let tree_labels: Vec<String> = rendered
        .lines()
        .map(|l| {
            l.trim_start_matches(|c: char| "│├└─ ".contains(c))
                .to_string()
        })
        .collect();
    assert_eq!(tree_labels, labels);
}

// ============================================================
// Stats
// ============================================================

#[test]
fn given_countdown_document_when_collecting_stats_then_counts_shape() {
    let (ast, root) = countdown();

    let stats = TreeStats::collect(&ast, root).unwrap();

    assert_eq!(
        stats,
        TreeStats {
            nodes: 17,
            depth: 6,
            leaves: 8,
            edges: 16,
        }
    );
}
