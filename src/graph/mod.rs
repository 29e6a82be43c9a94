// src/graph/mod.rs
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod predicates;
pub mod schema;
pub mod tree;
pub mod view;
