//! Domain layer types and invariants.

pub mod entities;
pub mod navigation;
pub mod ordering;
pub mod slug;
pub mod types;
