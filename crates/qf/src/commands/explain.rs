//! Explain command implementation.
//!
//! Prints the tree a query compiles to, one node per line.

use owo_colors::OwoColorize;
use qfilter::{Filter, FilterTreeNode};

use super::config::Config;
use super::{CommandContext, Result};

/// Executes the explain command.
pub fn execute(ctx: &CommandContext, query: &str, config: &Config) -> Result<()> {
    let filter = config.parser().parse(query);

    if ctx.json_output {
        let output = serde_json::json!({
            "query": query,
            "tree": filter.to_string(),
            "properties": filter.properties(),
            "empty": filter.is_empty(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", render_tree(&filter));
    if !filter.properties().is_empty() {
        let label = "Properties:";
        if ctx.use_colors {
            println!("\n{} {}", label.bold(), filter.properties().join(", "));
        } else {
            println!("\n{} {}", label, filter.properties().join(", "));
        }
    }

    Ok(())
}

/// Renders the filter as an indented tree.
fn render_tree(filter: &Filter) -> String {
    let mut out = String::new();
    render_node(filter.root(), 0, &mut out);
    out
}

fn render_node(node: &FilterTreeNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        FilterTreeNode::And(left, right) => {
            out.push_str(&format!("{indent}AND\n"));
            render_node(left, depth + 1, out);
            render_node(right, depth + 1, out);
        }
        FilterTreeNode::Or(left, right) => {
            out.push_str(&format!("{indent}OR\n"));
            render_node(left, depth + 1, out);
            render_node(right, depth + 1, out);
        }
        FilterTreeNode::Nor(left, right) => {
            out.push_str(&format!("{indent}XOR\n"));
            render_node(left, depth + 1, out);
            render_node(right, depth + 1, out);
        }
        FilterTreeNode::Not(inner) => {
            out.push_str(&format!("{indent}NOT\n"));
            render_node(inner, depth + 1, out);
        }
        FilterTreeNode::Child { key, filter } => {
            out.push_str(&format!("{indent}{key}(...)\n"));
            render_node(filter.root(), depth + 1, out);
        }
        FilterTreeNode::Value { .. } | FilterTreeNode::Empty => {
            out.push_str(&format!("{indent}{node}\n"));
        }
    }
}
