//! Lowering — turns a parsed [`Expr`] tree into a [`Program`]: variables
//! resolved to dense indices, calls resolved to direct function handles.

use crate::error::CompileError;
use crate::functions::{self, FunctionDescriptor};
use crate::parser::{BinaryOp, Expr};
use rustc_hash::FxHashMap;

/// The lowered, resolved counterpart of [`Expr`]. `VarRef` replaces
/// `Variable`, and `Call` carries a direct `&'static` function handle in
/// place of a name. This is the tree an evaluator walks.
#[derive(Debug, Clone)]
pub enum Node {
    /// A finite numeric literal.
    Literal(f64),
    /// A reference to binding-vector slot `index`.
    VarRef(usize),
    /// Unary negation.
    UnaryMinus(Box<Node>),
    /// A binary operator application.
    Binary(BinaryOp, Box<Node>, Box<Node>),
    /// A resolved call: the function's descriptor plus its argument nodes,
    /// evaluated left-to-right.
    Call(&'static FunctionDescriptor, Vec<Node>),
}

/// A compiled, immutable formula, ready to be evaluated any number of
/// times. Built once by [`lower`] (itself called from
/// [`crate::compile`]); thread-safe to share since every field is
/// immutable owned data or a `&'static` function pointer.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) tree: Node,
    /// Free variable names, in first-appearance (left-to-right) order.
    /// Index `i` here is the dense slot `VarRef(i)` refers to, and the
    /// slot a binding vector's position `i` supplies.
    pub(crate) var_names: Vec<String>,
}

impl Program {
    /// Free variable names, in first-appearance order. Index `i` is the
    /// binding-vector slot used by evaluation.
    #[must_use]
    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }
}

/// Lower a parsed `Expr` tree into a `Program`.
///
/// A single post-order walk: on first encounter of a `Variable(name)`, the
/// name is appended to the (initially empty) variable list and that new
/// index is used for every later reference to the same name. Each `Call`
/// is resolved against the built-in registry; an absent name fails with
/// [`CompileError::UnknownFunction`], an argument count outside the
/// function's range fails with [`CompileError::Arity`].
pub fn lower(expr: &Expr) -> Result<Program, CompileError> {
    let mut interner = VarInterner::default();
    let tree = lower_node(expr, &mut interner)?;
    Ok(Program { tree: fold_constants(tree), var_names: interner.names })
}

#[derive(Default)]
struct VarInterner {
    index_of: FxHashMap<String, usize>,
    names: Vec<String>,
}

impl VarInterner {
    fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index_of.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index_of.insert(name.to_string(), idx);
        idx
    }
}

fn lower_node(expr: &Expr, interner: &mut VarInterner) -> Result<Node, CompileError> {
    match expr {
        Expr::Literal(x) => Ok(Node::Literal(*x)),
        Expr::Variable(name) => Ok(Node::VarRef(interner.intern(name))),
        Expr::UnaryMinus(inner) => Ok(Node::UnaryMinus(Box::new(lower_node(inner, interner)?))),
        Expr::Binary(op, lhs, rhs) => {
            let lhs = lower_node(lhs, interner)?;
            let rhs = lower_node(rhs, interner)?;
            Ok(Node::Binary(*op, Box::new(lhs), Box::new(rhs)))
        }
        Expr::Call(name, args, span) => {
            let descriptor = functions::lookup(name).ok_or_else(|| CompileError::UnknownFunction {
                name: name.clone(),
                span: *span,
            })?;
            if !descriptor.accepts(args.len()) {
                return Err(CompileError::Arity {
                    name: name.clone(),
                    min: descriptor.min_arity,
                    max: descriptor.max_arity,
                    got: args.len(),
                    span: *span,
                });
            }
            let lowered_args =
                args.iter().map(|a| lower_node(a, interner)).collect::<Result<Vec<_>, _>>()?;
            Ok(Node::Call(descriptor, lowered_args))
        }
    }
}

/// Fold any node whose children are all literals into a single literal.
/// Purely an optional speed optimization (spec.md §4.4): the evaluator's
/// observable behavior, including NaN/∞ propagation, is identical whether
/// or not this pass runs.
#[must_use]
pub fn fold_constants(node: Node) -> Node {
    match node {
        Node::Literal(_) | Node::VarRef(_) => node,
        Node::UnaryMinus(inner) => {
            let inner = fold_constants(*inner);
            if let Node::Literal(x) = inner { Node::Literal(-x) } else { Node::UnaryMinus(Box::new(inner)) }
        }
        Node::Binary(op, lhs, rhs) => {
            let lhs = fold_constants(*lhs);
            let rhs = fold_constants(*rhs);
            if let (Node::Literal(l), Node::Literal(r)) = (&lhs, &rhs) {
                Node::Literal(apply_binary(op, *l, *r))
            } else {
                Node::Binary(op, Box::new(lhs), Box::new(rhs))
            }
        }
        Node::Call(descriptor, args) => {
            let args: Vec<Node> = args.into_iter().map(fold_constants).collect();
            let literal_values: Option<Vec<f64>> = args
                .iter()
                .map(|a| match a {
                    Node::Literal(x) => Some(*x),
                    _ => None,
                })
                .collect();
            match literal_values {
                Some(values) => Node::Literal((descriptor.eval)(&values)),
                None => Node::Call(descriptor, args),
            }
        }
    }
}

pub(crate) fn apply_binary(op: BinaryOp, l: f64, r: f64) -> f64 {
    match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Pow => l.powf(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn lower_str(src: &str) -> Program {
        let tokens = lex(src).expect("should lex");
        let expr = parse(&tokens).expect("should parse");
        lower(&expr).expect("should lower")
    }

    #[test]
    fn first_appearance_order() {
        let program = lower_str("y + x");
        assert_eq!(program.var_names(), &["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn repeated_variable_reuses_index() {
        let program = lower_str("x + x * x");
        assert_eq!(program.var_names(), &["x".to_string()]);
    }

    #[test]
    fn unknown_function_errors() {
        let tokens = lex("frobnicate(1)").expect("should lex");
        let expr = parse(&tokens).expect("should parse");
        assert!(matches!(lower(&expr), Err(CompileError::UnknownFunction { .. })));
    }

    #[test]
    fn arity_mismatch_errors() {
        let tokens = lex("sqrt(1, 2)").expect("should lex");
        let expr = parse(&tokens).expect("should parse");
        assert!(matches!(lower(&expr), Err(CompileError::Arity { .. })));
    }

    #[test]
    fn constant_subtrees_are_folded_during_lowering() {
        let program = lower_str("2 + 3 * 4");
        assert!(matches!(program.tree, Node::Literal(v) if (v - 14.0).abs() < 1e-12));
    }

    #[test]
    fn folding_a_tree_with_variables_leaves_the_variable_reference_intact() {
        let program = lower_str("x + 3 * 4");
        let Node::Binary(BinaryOp::Add, lhs, rhs) = program.tree else {
            assert!(false, "expected a top-level Add");
            return;
        };
        assert!(matches!(*lhs, Node::VarRef(0)));
        assert!(matches!(*rhs, Node::Literal(v) if (v - 12.0).abs() < 1e-12));
    }
}
