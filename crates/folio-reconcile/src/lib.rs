//! Reconciliation of stored and newly computed page sets.
//!
//! A volume already in the store is compared with a freshly validated
//! delivery by their sets of sequence keys. The comparison is a pure
//! function; reading the stored keys and validating the delivery happen
//! elsewhere.

pub mod reconciliation;

pub use reconciliation::{reconcile, Drift, Reconciliation};
