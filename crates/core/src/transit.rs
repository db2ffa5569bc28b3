//! Transit: lower a parsed [`Program`] into the editor's Tree Model.
//!
//! Only definitions survive as blocks; imports and exports carry no tree
//! counterpart. Comments are kept as plain text.

use graphlang_tree::{CaseNode, DefaultNode, Tree, TreeBlock, TreeNode};

use crate::ast::*;

pub fn program_to_tree(program: &Program) -> Tree {
    let mut blocks = Vec::new();
    let mut starts = Vec::new();
    let mut comments = Vec::new();

    for statement in &program.module_statements {
        match statement {
            ModuleStatement::Definition(definition) => {
                blocks.push(tree_block(&[], definition));
            }
            ModuleStatement::Start(start) => {
                starts.push(start.module.identifier.name().to_owned());
                match &start.module.definition {
                    Some(definition) => blocks.push(tree_block(&start.comments, definition)),
                    None => comments.extend(texts(&start.comments)),
                }
            }
            ModuleStatement::Export(export) => match &export.module.definition {
                Some(definition) => blocks.push(tree_block(&export.comments, definition)),
                None => comments.extend(texts(&export.comments)),
            },
            ModuleStatement::Import(import) => comments.extend(texts(&import.comments)),
        }
    }
    comments.extend(texts(&program.comments));

    tracing::debug!(
        blocks = blocks.len(),
        starts = starts.len(),
        "lowered program to tree"
    );
    Tree::new(blocks, starts, comments)
}

fn texts(comments: &[Comment]) -> impl Iterator<Item = String> + '_ {
    comments.iter().map(|c| c.text.clone())
}

fn tree_block(leading: &[Comment], definition: &InferenceDefinition) -> TreeBlock {
    let comments = texts(leading)
        .chain(texts(&definition.comments))
        .chain(texts(&definition.block.trailing_comments))
        .collect();
    TreeBlock::new(
        definition.identifier.name(),
        nodes(&definition.block),
        comments,
    )
}

fn nodes(block: &Block) -> Vec<TreeNode> {
    block.statements.iter().map(node).collect()
}

fn node(statement: &Statement) -> TreeNode {
    match statement {
        Statement::Step(s) => TreeNode::action(s.action.content(), texts(&s.comments).collect()),
        Statement::Goto(s) => TreeNode::goto(s.identifier.name(), texts(&s.comments).collect()),
        Statement::If(s) => {
            let mut comments: Vec<String> = texts(&s.comments)
                .chain(texts(&s.if_block.trailing_comments))
                .collect();
            let faild = match &s.else_block {
                Some(else_block) => {
                    comments.extend(texts(&else_block.trailing_comments));
                    nodes(else_block)
                }
                None => Vec::new(),
            };
            TreeNode::if_tree(s.condition.content(), nodes(&s.if_block), faild, comments)
        }
        Statement::Switch(s) => {
            let switch_block = &s.switch_block;
            let cases = switch_block.case_clauses.iter().map(case_node).collect();
            let default = switch_block.default_clause.as_ref().map(default_node);
            let comments = texts(&s.comments)
                .chain(texts(&switch_block.trailing_comments))
                .collect();
            TreeNode::switch(s.condition.content(), cases, default, comments)
        }
    }
}

fn case_node(clause: &CaseClause) -> CaseNode {
    let comments = texts(&clause.comments)
        .chain(texts(&clause.block.trailing_comments))
        .collect();
    CaseNode::new(clause.expectation.content(), nodes(&clause.block), comments)
}

fn default_node(clause: &DefaultClause) -> DefaultNode {
    let comments = texts(&clause.comments)
        .chain(texts(&clause.block.trailing_comments))
        .collect();
    DefaultNode::new(nodes(&clause.block), comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn tree_of(src: &str) -> Tree {
        let lexed = lex(src);
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        program_to_tree(&parse(&lexed.tokens).unwrap())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn definitions_and_inline_starts_become_blocks() {
        let tree = tree_of(
            r#"
import <x> from "./x.graph"
export <x>
<open> = {
  [打开携程首页]
}
start <order> = {
  goto <open>
}
start <open>
"#,
        );
        let names: Vec<&str> = tree.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["open", "order"]);
        assert_eq!(tree.starts, strings(&["order", "open"]));
        assert_eq!(
            tree.blocks[0].children,
            vec![TreeNode::action("打开携程首页", vec![])]
        );
        assert_eq!(tree.blocks[1].children, vec![TreeNode::goto("open", vec![])]);
    }

    #[test]
    fn if_without_else_has_empty_failure_list() {
        let tree = tree_of("<a> = {\n  if [cond] -> {\n    [yes]\n  }\n}");
        assert_eq!(
            tree.blocks[0].children,
            vec![TreeNode::if_tree(
                "cond",
                vec![TreeNode::action("yes", vec![])],
                vec![],
                vec![],
            )]
        );
    }

    #[test]
    fn switch_maps_cases_and_default() {
        let tree = tree_of(
            "<a> = {\n  switch [city] {\n    # local\n    case [sh] -> { [x] }\n    default -> { goto <a> }\n  }\n}",
        );
        assert_eq!(
            tree.blocks[0].children,
            vec![TreeNode::switch(
                "city",
                vec![CaseNode::new(
                    "sh",
                    vec![TreeNode::action("x", vec![])],
                    strings(&["local"]),
                )],
                Some(DefaultNode::new(vec![TreeNode::goto("a", vec![])], vec![])),
                vec![],
            )]
        );
    }

    #[test]
    fn comments_land_on_the_owning_node() {
        let tree = tree_of(
            r#"# header

# main flow
start <main> = {
  # pick a city
  if [not_here] -> {
    [pick]
    # after pick
  }
  [done]
  # end of main
}
# footer
"#,
        );
        assert_eq!(tree.comments, strings(&["header", "footer"]));
        let block = &tree.blocks[0];
        assert_eq!(block.comments, strings(&["main flow", "end of main"]));
        assert_eq!(
            block.children[0].comments(),
            strings(&["pick a city", "after pick"]).as_slice()
        );
    }

    #[test]
    fn non_block_statement_comments_go_to_the_tree() {
        let tree = tree_of("# entry point\nstart <main>\n<main> = { }");
        assert_eq!(tree.comments, strings(&["entry point"]));
        assert!(tree.blocks[0].comments.is_empty());
    }

    #[test]
    fn empty_program_gives_empty_tree() {
        assert_eq!(tree_of(""), Tree::default());
    }
}
