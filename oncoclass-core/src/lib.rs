//! Oncoclass Core
//!
//! Core types shared by the Oncoclass job client and its front ends.
//!
//! This crate contains:
//! - Domain types: job outcomes and analysis results (t-SNE, confidence, bulk classification)
//! - DTOs: wire envelopes and request payloads exchanged with the analysis backend

pub mod domain;
pub mod dto;
