//! Static registry of built-in functions, keyed by name.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Definition of a built-in function: its accepted arity range and its
/// numeric evaluation rule.
#[derive(Debug, Clone, Copy)]
pub struct FunctionDescriptor {
    /// Canonical, case-sensitive name.
    pub name: &'static str,
    /// Minimum number of arguments accepted.
    pub min_arity: usize,
    /// Maximum number of arguments accepted, `None` if variadic.
    pub max_arity: Option<usize>,
    /// Evaluation rule: maps the (already-evaluated, left-to-right)
    /// argument vector to a result. May return NaN/±∞ — those are values,
    /// not errors.
    pub eval: fn(&[f64]) -> f64,
}

impl FunctionDescriptor {
    /// Whether `count` arguments satisfy this function's arity.
    #[inline]
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_arity && self.max_arity.is_none_or(|max| count <= max)
    }
}

static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDescriptor>> = OnceLock::new();

fn build_registry() -> FxHashMap<&'static str, FunctionDescriptor> {
    let defs: &[FunctionDescriptor] = &[
        FunctionDescriptor { name: "max", min_arity: 1, max_arity: None, eval: eval_max },
        FunctionDescriptor { name: "min", min_arity: 1, max_arity: None, eval: eval_min },
        FunctionDescriptor {
            name: "sqrt",
            min_arity: 1,
            max_arity: Some(1),
            eval: |args| args[0].sqrt(),
        },
        FunctionDescriptor { name: "abs", min_arity: 1, max_arity: Some(1), eval: |args| args[0].abs() },
        // Declared extensions beyond the mandatory set (spec.md Design Note #3).
        FunctionDescriptor { name: "exp", min_arity: 1, max_arity: Some(1), eval: |args| args[0].exp() },
        FunctionDescriptor { name: "ln", min_arity: 1, max_arity: Some(1), eval: |args| args[0].ln() },
        FunctionDescriptor { name: "sin", min_arity: 1, max_arity: Some(1), eval: |args| args[0].sin() },
        FunctionDescriptor { name: "cos", min_arity: 1, max_arity: Some(1), eval: |args| args[0].cos() },
        FunctionDescriptor {
            name: "pow",
            min_arity: 2,
            max_arity: Some(2),
            eval: |args| args[0].powf(args[1]),
        },
    ];

    defs.iter().map(|d| (d.name, *d)).collect()
}

/// NaN propagates left-to-right: the first NaN argument short-circuits the
/// fold, matching the spec's requirement that `max`/`min` NaN propagation be
/// observable as left-to-right evaluation order.
fn eval_max(args: &[f64]) -> f64 {
    let mut acc = args[0];
    for &v in &args[1..] {
        if acc.is_nan() || v.is_nan() {
            return f64::NAN;
        }
        acc = acc.max(v);
    }
    acc
}

/// See [`eval_max`].
fn eval_min(args: &[f64]) -> f64 {
    let mut acc = args[0];
    for &v in &args[1..] {
        if acc.is_nan() || v.is_nan() {
            return f64::NAN;
        }
        acc = acc.min(v);
    }
    acc
}

/// Look up a built-in by name. `O(1)` after the first call, which builds
/// the table.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static FunctionDescriptor> {
    REGISTRY.get_or_init(build_registry).get(name)
}
