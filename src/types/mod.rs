//! Type definitions module
//!
//! Document model and pagination types shared by every layer.

pub mod page;
pub mod product;

// Re-export commonly used types
pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use product::{Product, FIELD_CATEGORY, FIELD_DESCRIPTION, FIELD_ID, FIELD_NAME};
