//! Work-lead status engine.
//!
//! Applies status writes on the pivot tables and propagates group-level
//! template statuses down to every project of the group session.

pub mod propagation;
