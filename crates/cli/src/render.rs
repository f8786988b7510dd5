//! Indented text dump of a parsed block.

use std::io::{self, Write};

use dsltk_core::{ActionNode, Block, Expr};

pub fn write_block<W: Write>(out: &mut W, block: &Block) -> io::Result<()> {
    for action in block {
        write_action(out, action)?;
    }
    Ok(())
}

pub fn write_action<W: Write>(out: &mut W, action: &ActionNode) -> io::Result<()> {
    writeln!(out, "Action {{ action = {}, arguments = {{", action.action)?;
    for (name, value) in action.arguments.iter() {
        writeln!(out, "  {}: {}", name, expr_text(value))?;
    }
    writeln!(out, "}}")
}

pub fn expr_text(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => format!("Constant({:?})", n),
        Expr::Str(s) => format!("Constant({})", s),
        Expr::Bool(b) => format!("Constant({})", b),
        Expr::Var(name) => format!("VarAccess({})", name),
        Expr::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(expr_text).collect();
            format!("Sequence[{}]", inner.join(", "))
        }
    }
}
