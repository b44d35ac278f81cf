//! Product document model
//!
//! The searchable entity stored in the Solr core. Field names match the
//! core's schema one to one.

use crate::errors::{RepositoryError, Result};
use serde::{Deserialize, Serialize};

/// Field holding the unique key
pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DESCRIPTION: &str = "description";

/// A searchable product document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
}

impl Product {
    /// Create a fully populated product
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Value of a schema field by name, `None` for fields the model lacks
    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            FIELD_ID => Some(&self.id),
            FIELD_NAME => Some(&self.name),
            FIELD_CATEGORY => Some(&self.category),
            FIELD_DESCRIPTION => Some(&self.description),
            _ => None,
        }
    }

    /// Check the preconditions for persisting this product
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RepositoryError::Validation(
                "product id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut product = Product::new("P0001", "T-Shirt", "Kitchen", "New T-Shirt");
        assert_eq!(product.id(), "P0001");
        assert_eq!(product.category(), "Kitchen");

        product.set_category("Clothes");
        assert_eq!(product.category(), "Clothes");
        assert_eq!(product.field(FIELD_CATEGORY), Some("Clothes"));
        assert_eq!(product.field("price"), None);
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let product = Product::new("   ", "Desk", "Furniture", "New Desk");
        let err = product.validate().unwrap_err();
        assert!(err.is_validation());

        assert!(Product::default().validate().is_err());
        assert!(Product::new("P1", "", "", "").validate().is_ok());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let product: Product = serde_json::from_str(r#"{"id":"P9"}"#).unwrap();
        assert_eq!(product.id(), "P9");
        assert!(product.name().is_empty());
    }
}
