pub mod diet;
pub mod health;
pub mod mood;
pub mod patient;
pub mod professional;
pub mod session;
pub mod weight;
