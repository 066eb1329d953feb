//! Domain types shared across DietCare crates.
//!
//! Pure value types with no framework dependencies. Import in `usecase/` and `domain/`
//! layers; `infra/` converts to and from storage representations.

pub mod access_code;
pub mod diet_level;
pub mod id;
pub mod measure;
pub mod pagination;
