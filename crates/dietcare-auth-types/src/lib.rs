//! Authentication types shared by the DietCare API and its tests.
//!
//! Provides the session cookie builders, request credential parsing, OAuth token
//! validation and the `Principal` extractors routes use to declare who may call them.

pub mod cookie;
pub mod credential;
pub mod principal;
pub mod token;
