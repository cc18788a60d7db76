//! Linguistic processing utilities.
//!
//! This crate measures generated text against the spoken-length budget of a
//! podcast. See [`WordBudget`].

pub mod budget;

pub use crate::budget::*;
