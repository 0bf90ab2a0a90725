//! Response models for the group cache API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies. Values themselves are served as raw bytes.

pub mod responses;

// Re-export commonly used types
pub use responses::{ErrorResponse, GroupStatsResponse, HealthResponse, StatsResponse};
