pub mod access_code;
pub mod diet;
pub mod mood;
pub mod patient;
pub mod professional;
pub mod session;
pub mod weight;
