//! mietpreis-rs
//!
//! Umbrella crate over [`mietpreis_core`], hosting the demos.

pub use mietpreis_core::*;
