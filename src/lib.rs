//! Post-processing of QA benchmark runs.
//!
//! A run is a headerless `node,timestamp,value` CSV. [`normalize`] turns one
//! raw run into canonical form; [`average`] combines several normalized runs
//! of the same experiment into one.

pub mod average;
pub mod error;
pub mod normalize;
pub mod table;
pub mod todos;

pub use error::{Error, Result};
