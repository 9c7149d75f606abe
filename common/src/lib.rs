//! This crate provides the types shared by the learners of the workspace

#![warn(missing_docs, unused_crate_dependencies)]

mod datapoint;
mod error;
mod persist;
mod sparse_vector;

pub use datapoint::{Datapoint, TextDatapoint};
pub use error::{Error, Result};
pub use persist::{read_json, write_json, Persist};
pub use sparse_vector::SparseVector;
