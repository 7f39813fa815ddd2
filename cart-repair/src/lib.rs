//! Shopping-cart repair for client-side local storage
//!
//! Provides:
//! - Parsing of the stored cart blob with pass-through of unknown fields
//! - Replacement of missing or placeholder image references
//! - Normalization of invalid quantities to one
//! - A storage interface with in-memory and file-backed implementations
//! - A serializable report describing what a pass did

pub mod cart;
pub mod config;
pub mod error;
pub mod item;
pub mod report;
pub mod sanitizer;
pub mod storage;

pub use cart::{Cart, CartEntry};
pub use config::{SanitizerConfig, DEFAULT_IMAGE_URL, DEFAULT_STORAGE_KEY};
pub use error::{CartError, CartResult, ErrorKind};
pub use item::{CartItem, ItemRepair, RepairedField};
pub use report::{RepairStatus, SanitizeReport};
pub use sanitizer::{plan_repair, CartSanitizer, RepairPlan};
pub use storage::{CartStore, FileStore, InMemoryStore};
