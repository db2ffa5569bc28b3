//! Canonical source printer for the Tree Model.

use std::fmt::Write;

use graphlang_tree::{CaseNode, DefaultNode, Tree, TreeNode};

const INDENT: &str = "  ";

/// Render `tree` as canonical source.
///
/// Tree comments come first, separated from the rest by a blank line;
/// blocks follow in order, then one `start` line per start entry.
pub fn print_tree(tree: &Tree) -> String {
    let mut printer = Printer::default();
    if !tree.comments.is_empty() {
        printer.comments(0, &tree.comments);
        printer.blank();
    }
    for (i, block) in tree.blocks.iter().enumerate() {
        if i > 0 {
            printer.blank();
        }
        printer.comments(0, &block.comments);
        printer.line(0, format_args!("<{}> = {{", block.name));
        printer.nodes(1, &block.children);
        printer.line(0, format_args!("}}"));
    }
    if !tree.starts.is_empty() && !tree.blocks.is_empty() {
        printer.blank();
    }
    for start in &tree.starts {
        printer.line(0, format_args!("start <{}>", start));
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn line(&mut self, depth: usize, args: std::fmt::Arguments<'_>) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn comments(&mut self, depth: usize, comments: &[String]) {
        for comment in comments {
            if comment.is_empty() {
                self.line(depth, format_args!("#"));
            } else {
                self.line(depth, format_args!("# {}", comment));
            }
        }
    }

    fn nodes(&mut self, depth: usize, nodes: &[TreeNode]) {
        for node in nodes {
            self.node(depth, node);
        }
    }

    fn node(&mut self, depth: usize, node: &TreeNode) {
        self.comments(depth, node.comments());
        match node {
            TreeNode::ActionNode(n) => self.line(depth, format_args!("[{}]", n.expression)),
            TreeNode::GotoNode(n) => self.line(depth, format_args!("goto <{}>", n.name)),
            TreeNode::IfTree(n) => {
                self.line(depth, format_args!("if [{}] -> {{", n.condition));
                self.nodes(depth + 1, &n.success_children);
                if !n.faild_children.is_empty() {
                    self.line(depth, format_args!("}} else -> {{"));
                    self.nodes(depth + 1, &n.faild_children);
                }
                self.line(depth, format_args!("}}"));
            }
            TreeNode::SwitchTree(n) => {
                self.line(depth, format_args!("switch [{}] {{", n.condition));
                for case in &n.children {
                    self.case_clause(depth + 1, case);
                }
                if let Some(default) = &n.default_child {
                    self.default_clause(depth + 1, default);
                }
                self.line(depth, format_args!("}}"));
            }
        }
    }

    fn case_clause(&mut self, depth: usize, case: &CaseNode) {
        self.comments(depth, &case.comments);
        self.line(depth, format_args!("case [{}] -> {{", case.expectation));
        self.nodes(depth + 1, &case.children);
        self.line(depth, format_args!("}}"));
    }

    fn default_clause(&mut self, depth: usize, default: &DefaultNode) {
        self.comments(depth, &default.comments);
        self.line(depth, format_args!("default -> {{"));
        self.nodes(depth + 1, &default.children);
        self.line(depth, format_args!("}}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::transit::program_to_tree;
    use graphlang_tree::TreeBlock;

    fn reparse(src: &str) -> Tree {
        let lexed = lex(src);
        assert!(lexed.errors.is_empty(), "{:?}\n{}", lexed.errors, src);
        program_to_tree(&parse(&lexed.tokens).unwrap())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prints_canonical_layout() {
        let tree = Tree::new(
            vec![TreeBlock::new(
                "main",
                vec![
                    TreeNode::action("open", strings(&["first"])),
                    TreeNode::if_tree(
                        "ready",
                        vec![TreeNode::goto("next", vec![])],
                        vec![TreeNode::action("wait", vec![])],
                        vec![],
                    ),
                ],
                strings(&["entry"]),
            )],
            strings(&["main"]),
            strings(&["generated"]),
        );
        let expected = "\
# generated

# entry
<main> = {
  # first
  [open]
  if [ready] -> {
    goto <next>
  } else -> {
    [wait]
  }
}

start <main>
";
        assert_eq!(print_tree(&tree), expected);
    }

    #[test]
    fn switch_prints_cases_then_default() {
        let tree = Tree::new(
            vec![TreeBlock::new(
                "route",
                vec![TreeNode::switch(
                    "city",
                    vec![CaseNode::new("sh", vec![], strings(&["local"]))],
                    Some(DefaultNode::new(vec![TreeNode::goto("route", vec![])], vec![])),
                    vec![],
                )],
                vec![],
            )],
            vec![],
            vec![],
        );
        let expected = "\
<route> = {
  switch [city] {
    # local
    case [sh] -> {
    }
    default -> {
      goto <route>
    }
  }
}
";
        assert_eq!(print_tree(&tree), expected);
    }

    #[test]
    fn printed_source_reparses_to_the_same_tree() {
        let tree = Tree::new(
            vec![
                TreeBlock::new(
                    "下单流程",
                    vec![
                        TreeNode::goto("从首页进入旅游频道", strings(&["确认是上海站"])),
                        TreeNode::if_tree(
                            "不是上海站",
                            vec![TreeNode::action("点击顶部城市选择栏", vec![])],
                            vec![],
                            strings(&["如果不是", "选择上海站"]),
                        ),
                        TreeNode::switch(
                            "当前城市",
                            vec![
                                CaseNode::new("上海", vec![], vec![]),
                                CaseNode::new("北京", vec![], strings(&["todo"])),
                            ],
                            None,
                            vec![],
                        ),
                    ],
                    strings(&["main flow"]),
                ),
                TreeBlock::new("从首页进入旅游频道", vec![], vec![]),
            ],
            strings(&["下单流程"]),
            strings(&["header", "second header line"]),
        );
        assert_eq!(reparse(&print_tree(&tree)), tree);
    }

    #[test]
    fn empty_tree_prints_nothing() {
        assert_eq!(print_tree(&Tree::default()), "");
        assert_eq!(reparse(""), Tree::default());
    }

    #[test]
    fn starts_without_blocks_round_trip() {
        let tree = Tree::new(vec![], strings(&["a", "b"]), strings(&["only starts"]));
        let printed = print_tree(&tree);
        assert_eq!(printed, "# only starts\n\nstart <a>\nstart <b>\n");
        assert_eq!(reparse(&printed), tree);
    }
}
