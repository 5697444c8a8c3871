//! Evaluation — walking a lowered [`Program`] tree to a number, either once
//! against a [`Context`] or many times against a batch of binding vectors.

use crate::context::Context;
use crate::error::RuntimeError;
use crate::lowering::{Node, Program, apply_binary};

impl Program {
    /// Evaluate against a single [`Context`].
    ///
    /// Every free variable named by [`Program::var_names`] must have a
    /// binding in `ctx`; the first one missing fails with
    /// [`RuntimeError::UnboundVariable`]. Bindings `ctx` holds that the
    /// program does not reference are ignored.
    ///
    /// # Errors
    /// Returns [`RuntimeError::UnboundVariable`] if `ctx` is missing a
    /// binding the program references.
    pub fn eval(&self, ctx: &Context) -> Result<f64, RuntimeError> {
        let bindings = self
            .var_names
            .iter()
            .map(|name| ctx.get(name).ok_or_else(|| RuntimeError::UnboundVariable(name.clone())))
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(eval_node(&self.tree, &bindings))
    }

    /// Evaluate against a batch of binding vectors.
    ///
    /// Each vector supplies one value per entry of [`Program::var_names`],
    /// in that order. Every vector's length is checked against
    /// `var_names().len()` *before* any element is evaluated: a single
    /// mismatched vector fails the whole batch atomically, with no partial
    /// results. An empty `vectors` returns `Ok(vec![])` without touching
    /// the tree at all.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Arity`] if any vector's length does not
    /// match `var_names().len()`.
    pub fn eval_batch(&self, vectors: &[Vec<f64>]) -> Result<Vec<f64>, RuntimeError> {
        let expected = self.var_names.len();
        for v in vectors {
            if v.len() != expected {
                return Err(RuntimeError::Arity { expected, got: v.len() });
            }
        }
        Ok(vectors.iter().map(|v| eval_node(&self.tree, v)).collect())
    }

    /// Evaluate a batch of binding vectors using a thread pool.
    ///
    /// Same contract as [`Program::eval_batch`] — identical per-element
    /// results, same atomic length check before any evaluation — but
    /// spreads the per-vector work across [`rayon`]'s global thread pool.
    /// Worthwhile once a batch is large enough that the parallelism
    /// overhead is paid back by the work per element.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Arity`] if any vector's length does not
    /// match `var_names().len()`.
    #[cfg(feature = "parallel")]
    pub fn eval_batch_parallel(&self, vectors: &[Vec<f64>]) -> Result<Vec<f64>, RuntimeError> {
        use rayon::prelude::*;

        let expected = self.var_names.len();
        for v in vectors {
            if v.len() != expected {
                return Err(RuntimeError::Arity { expected, got: v.len() });
            }
        }
        Ok(vectors.par_iter().map(|v| eval_node(&self.tree, v)).collect())
    }
}

/// Recursively walk a lowered tree. `bindings[i]` supplies the value for
/// `VarRef(i)`; by construction (see [`crate::lowering`]) every `VarRef`
/// index is in bounds.
fn eval_node(node: &Node, bindings: &[f64]) -> f64 {
    match node {
        Node::Literal(x) => *x,
        Node::VarRef(idx) => bindings[*idx],
        Node::UnaryMinus(inner) => -eval_node(inner, bindings),
        Node::Binary(op, lhs, rhs) => {
            apply_binary(*op, eval_node(lhs, bindings), eval_node(rhs, bindings))
        }
        Node::Call(descriptor, args) => {
            let values: Vec<f64> = args.iter().map(|a| eval_node(a, bindings)).collect();
            (descriptor.eval)(&values)
        }
    }
}
