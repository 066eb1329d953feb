//! Service plumbing shared by DietCare binaries: tracing, request ids, health probes
//! and wire-format helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
