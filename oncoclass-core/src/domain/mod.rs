//! Core domain types
//!
//! This module contains the structures produced by the analysis backend and
//! the normalized outcome every asynchronous job resolves to.

pub mod analysis;
pub mod job;
