//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub category: Option<String>,
    pub price: u64,
    pub stock: u32,
}

/// Product Update Data
///
/// Replaces every mutable catalog attribute at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub category: Option<String>,
    pub price: u64,
    pub stock: u32,
    pub active: bool,
}
