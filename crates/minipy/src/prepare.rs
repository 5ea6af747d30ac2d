//! Name resolution between parsing and evaluation.
//!
//! Every name that is the target of an assignment anywhere in the module gets
//! a global slot. Each identifier then records its slot (if any) and the
//! builtin of the same name (if any); the evaluator picks between them at run
//! time, following module-level `LOAD_NAME` semantics.

use std::str::FromStr;

use ahash::AHashMap;

use crate::{
    builtins::Builtins,
    expressions::{Expr, ExprLoc, Identifier, Node},
    namespace::NamespaceId,
};

/// Result of the prepare phase.
#[derive(Debug)]
pub(crate) struct PrepareResult {
    /// Number of global slots the module needs.
    pub namespace_size: usize,
    /// Variable names indexed by slot, in first-assignment order.
    pub slot_names: Vec<String>,
    /// Statements with all names resolved.
    pub nodes: Vec<Node>,
}

/// Resolves every name in `nodes`.
pub(crate) fn prepare(nodes: Vec<Node>) -> PrepareResult {
    let mut p = Prepare::default();
    for node in &nodes {
        if let Node::Assign { target, .. } = node {
            p.declare(&target.name);
        }
    }
    let nodes = nodes.into_iter().map(|node| p.prepare_node(node)).collect();
    PrepareResult {
        namespace_size: p.slot_names.len(),
        slot_names: p.slot_names,
        nodes,
    }
}

#[derive(Debug, Default)]
struct Prepare {
    name_map: AHashMap<String, NamespaceId>,
    slot_names: Vec<String>,
}

impl Prepare {
    fn declare(&mut self, name: &str) {
        if !self.name_map.contains_key(name) {
            let id = NamespaceId::new(self.slot_names.len());
            self.name_map.insert(name.to_owned(), id);
            self.slot_names.push(name.to_owned());
        }
    }

    fn resolve(&self, mut ident: Identifier) -> Identifier {
        ident.slot = self.name_map.get(&ident.name).copied();
        ident.builtin = Builtins::from_str(&ident.name).ok();
        ident
    }

    fn prepare_node(&self, node: Node) -> Node {
        match node {
            Node::Expr(expr) => Node::Expr(self.prepare_expr(expr)),
            Node::Assign { target, object } => Node::Assign {
                target: self.resolve(target),
                object: self.prepare_expr(object),
            },
        }
    }

    fn prepare_expr(&self, expr_loc: ExprLoc) -> ExprLoc {
        let ExprLoc { position, expr } = expr_loc;
        let expr = match expr {
            Expr::Literal(_) => expr,
            Expr::Name(ident) => Expr::Name(self.resolve(ident)),
            Expr::Call { callable, args } => Expr::Call {
                callable: Box::new(self.prepare_expr(*callable)),
                args: self.prepare_exprs(args),
            },
            Expr::Op { left, op, right } => Expr::Op {
                left: Box::new(self.prepare_expr(*left)),
                op,
                right: Box::new(self.prepare_expr(*right)),
            },
            Expr::Unary { op, operand } => Expr::Unary {
                op,
                operand: Box::new(self.prepare_expr(*operand)),
            },
            Expr::Tuple(items) => Expr::Tuple(self.prepare_exprs(items)),
            Expr::List(items) => Expr::List(self.prepare_exprs(items)),
            Expr::Dict(pairs) => Expr::Dict(
                pairs
                    .into_iter()
                    .map(|(key, value)| (self.prepare_expr(key), self.prepare_expr(value)))
                    .collect(),
            ),
        };
        ExprLoc::new(position, expr)
    }

    fn prepare_exprs(&self, exprs: Vec<ExprLoc>) -> Vec<ExprLoc> {
        exprs.into_iter().map(|expr| self.prepare_expr(expr)).collect()
    }
}
