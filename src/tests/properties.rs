//! Property-based tests over the invariants in the end-to-end scenario
//! table, generated instead of enumerated by hand.

use crate::{Context, compile};
use quickcheck_macros::quickcheck;

/// A fixed pool of formulas with a known, fixed set of free variables, used
/// as the universe `quickcheck` draws binding vectors against. Random
/// *source text* would mostly fail to parse; what's worth fuzzing here is
/// the binding data, not the formula shape.
const FORMULAS: &[(&str, usize)] = &[
    ("x + y", 2),
    ("x * 2 - y / 3", 2),
    ("max(x, y, z)", 3),
    ("sqrt(abs(x)) + y^2", 2),
    ("-x^2 + y", 2),
];

#[quickcheck]
fn single_eval_matches_batch_of_one(formula_index: usize, raw_bindings: Vec<f64>) -> bool {
    let (source, arity) = FORMULAS[formula_index % FORMULAS.len()];
    let program = compile(source).expect("fixed formula pool always compiles");

    let mut bindings: Vec<f64> = raw_bindings.into_iter().take(arity).collect();
    bindings.resize(arity, 1.0);

    let mut ctx = Context::new();
    for (name, value) in program.var_names().iter().zip(bindings.iter()) {
        ctx.set(name.clone(), *value);
    }

    let single = program.eval(&ctx).expect("all vars bound");
    let batch = program.eval_batch(&[bindings]).expect("correct arity");
    single.to_bits() == batch[0].to_bits() || (single.is_nan() && batch[0].is_nan())
}

#[quickcheck]
fn batch_length_matches_input_length(formula_index: usize, batch_size: u8) -> bool {
    let (source, arity) = FORMULAS[formula_index % FORMULAS.len()];
    let program = compile(source).expect("fixed formula pool always compiles");

    let vectors: Vec<Vec<f64>> = (0..batch_size).map(|i| vec![f64::from(i); arity]).collect();
    let result = program.eval_batch(&vectors).expect("correct arity");
    result.len() == vectors.len()
}

#[test]
fn empty_batch_is_always_empty() {
    for (source, _) in FORMULAS {
        let program = compile(source).expect("fixed formula pool always compiles");
        assert_eq!(program.eval_batch(&[]), Ok(vec![]));
    }
}

#[test]
fn compile_is_idempotent_across_the_pool() {
    for (source, arity) in FORMULAS {
        let a = compile(source).expect("fixed formula pool always compiles");
        let b = compile(source).expect("fixed formula pool always compiles");
        assert_eq!(a.var_names(), b.var_names());
        assert_eq!(a.var_names().len(), *arity);

        let bindings = vec![2.0; *arity];
        assert_eq!(
            a.eval_batch(&[bindings.clone()]).expect("correct arity"),
            b.eval_batch(&[bindings]).expect("correct arity")
        );
    }
}
