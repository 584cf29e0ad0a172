//! Response models for the admin API
//!
//! DTOs serialized by the admin endpoints.

pub mod responses;

// Re-export commonly used types
pub use responses::{EntriesResponse, EntrySummary, HealthResponse, StatsResponse};
