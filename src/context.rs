//! [`Context`] — the caller-owned, mutable name→value binding table used by
//! single evaluation.

use rustc_hash::FxHashMap;

/// A mutable mapping from variable name to numeric value, supplied by the
/// caller at evaluation time.
///
/// A `Context` carries no knowledge of any [`crate::Program`]; the same
/// `Context` may be reused across programs whose variable sets overlap, and
/// its lifetime is independent of any program built before or after it.
/// `Context` is single-owner: sharing one across threads is the caller's
/// responsibility, matching [`crate::Program`]'s own thread-safety story
/// (immutable and freely shareable) being contingent on a `Context` never
/// being mutated concurrently.
#[derive(Debug, Clone, Default)]
pub struct Context {
    bindings: FxHashMap<String, f64>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, overwriting any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a binding by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings.get(name).copied()
    }

    /// Remove a binding, if present.
    pub fn remove(&mut self, name: &str) {
        self.bindings.remove(name);
    }

    /// Number of bindings currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, f64)> for Context {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self { bindings: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut ctx = Context::new();
        ctx.set("x", 10.0);
        assert_eq!(ctx.get("x"), Some(10.0));
    }

    #[test]
    fn missing_binding_is_absent() {
        let ctx = Context::new();
        assert_eq!(ctx.get("x"), None);
    }

    #[test]
    fn set_overwrites() {
        let mut ctx = Context::new();
        ctx.set("x", 1.0);
        ctx.set("x", 2.0);
        assert_eq!(ctx.get("x"), Some(2.0));
    }

    #[test]
    fn remove_clears_binding() {
        let mut ctx = Context::new();
        ctx.set("x", 1.0);
        ctx.remove("x");
        assert_eq!(ctx.get("x"), None);
    }

    #[test]
    fn reused_across_programs_with_overlapping_vars() {
        let mut ctx = Context::new();
        ctx.set("x", 1.0);
        ctx.set("y", 2.0);
        assert_eq!(ctx.len(), 2);
    }
}
