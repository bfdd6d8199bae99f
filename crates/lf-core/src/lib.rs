//! lostfound/crates/lf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the lost & found
//! service: models, the error taxonomy, collaborator ports, and the two
//! services that sit on top of them.

pub mod directory;
pub mod error;
pub mod items;
pub mod models;
pub mod timeout;
pub mod traits;

// Re-exporting for easier access in other crates
pub use directory::AccountDirectory;
pub use error::*;
pub use items::ItemRecordStore;
pub use models::*;
pub use traits::*;
