//! devgraph Core Types
//!
//! This crate provides the foundational types shared by the devgraph
//! crates. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and border intersection ([`geometry`] module)
//! - **Identifiers**: String-interned type tags ([`identifier::Id`])

pub mod geometry;
pub mod identifier;
