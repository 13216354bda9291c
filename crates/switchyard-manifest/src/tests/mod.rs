//! Crate-level BDD tests.
