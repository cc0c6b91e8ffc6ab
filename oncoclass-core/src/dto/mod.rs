//! Data Transfer Objects for backend communication
//!
//! This module contains the envelopes and request bodies exchanged with the
//! analysis backend. They mirror its JSON wire format exactly.

pub mod analysis;
pub mod job;
