//! Query module
//!
//! Explicit criteria plus declarative, named query templates.

pub mod criteria;
pub mod template;

// Re-export commonly used types
pub use criteria::Criteria;
pub use template::{NamedQueries, QueryTemplate, FIND_BY_NAMED_QUERY, FREE_TEXT_TEMPLATE};
