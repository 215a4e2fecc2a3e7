//! Consolidated test utilities for gnit
//!
//! Working directories live in temporary directories; realm access goes
//! through an in-memory realm so tests never need a node.

pub mod assertions;
pub mod fixtures;
pub mod repository;
