//! Resource layer
//!
//! - [`kind`] - the closed set of Tower resource types, as data
//! - [`base`] - the generic CRUD implementation shared by all of them

pub mod base;
pub mod kind;

pub use base::{merge_params, sanitize_json_input, Resource};
pub use kind::ResourceKind;
