// src/datatypes/mod.rs
pub mod values;

pub use values::Value;
