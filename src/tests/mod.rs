//! Integration and property tests exercising the public API end to end,
//! rather than a single module in isolation.

mod properties;
