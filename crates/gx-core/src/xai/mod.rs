//! xAI API client and types
//!
//! Covers the three endpoints the gateway uses: chat completions, image
//! generation, and video generation.

mod client;
pub mod models;
mod types;

pub use client::XaiClient;
pub use types::*;
