//! Tree rendering of plans.
//!
//! [`explain`] prints one operator per line. [`explain_verbose`] adds what the node produces:
//! the output slots of bound nodes, `[unbound]` for nodes whose output can't be derived yet,
//! and the group expression a node was copied out of.

use std::borrow::Cow;
use std::io::{BufWriter, Write};

use ptree::print_config::UTF_CHARS;
use ptree::{write_tree_with, PrintConfig, Style, TreeItem};

use crate::expr::display_slots;
use crate::plan::{PlanNode, PlanNodeRef};

#[derive(Clone, Copy)]
struct ExplainNode<'a> {
    node: &'a PlanNode,
    verbose: bool,
}

impl<'a> TreeItem for ExplainNode<'a> {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, style: &Style) -> std::io::Result<()> {
        write!(f, "{}", style.paint(self.node.operator()))?;
        if !self.verbose {
            return Ok(());
        }

        match self.node.output() {
            Ok(slots) => write!(f, " -> {}", display_slots(slots))?,
            Err(_) => write!(f, " [unbound]")?,
        }
        if let Some(group_expr) = self.node.group_expr() {
            write!(f, " @{}", group_expr)?;
        }
        Ok(())
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let verbose = self.verbose;
        self.node
            .inputs()
            .iter()
            .map(|input| ExplainNode {
                node: input,
                verbose,
            })
            .collect::<Vec<_>>()
            .into()
    }
}

fn write_plan<W: Write>(plan: &PlanNodeRef, verbose: bool, output: &mut W) -> std::io::Result<()> {
    let config = PrintConfig {
        indent: 3,
        characters: UTF_CHARS.into(),
        ..Default::default()
    };
    let root = ExplainNode {
        node: plan,
        verbose,
    };
    write_tree_with(&root, output, &config)
}

fn render(plan: &PlanNodeRef, verbose: bool) -> std::io::Result<String> {
    let mut buf = BufWriter::new(Vec::new());
    write_plan(plan, verbose, &mut buf)?;

    let bytes = buf.into_inner()?;
    String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

pub fn explain<W: Write>(plan: &PlanNodeRef, output: &mut W) -> std::io::Result<()> {
    write_plan(plan, false, output)
}

pub fn explain_verbose<W: Write>(plan: &PlanNodeRef, output: &mut W) -> std::io::Result<()> {
    write_plan(plan, true, output)
}

pub fn explain_to_string(plan: &PlanNodeRef) -> std::io::Result<String> {
    render(plan, false)
}

pub fn explain_verbose_to_string(plan: &PlanNodeRef) -> std::io::Result<String> {
    render(plan, true)
}
