//! Product field rules.
//!
//! All rules are checked on every call; the caller gets the full list of
//! violations rather than the first one.

use super::types::{Product, ProductInput};

pub const NAME_MIN_LEN: usize = 2;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const RATING_MAX: f64 = 5.0;

pub const ERR_NAME: &str = "Product name must be at least 2 characters long";
pub const ERR_DESCRIPTION: &str = "Product description must be at least 10 characters long";
pub const ERR_CATEGORY: &str = "Product category is required";
pub const ERR_BRAND: &str = "Product brand is required";
pub const ERR_PRICE: &str = "Product price must be a positive number";
pub const ERR_STOCK: &str = "Product stock must be a non-negative number";
pub const ERR_RATING: &str = "Product rating must be between 0 and 5";

/// Borrowed view of the validated fields, shared by new and merged products.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub rating: f64,
}

impl<'a> From<&'a ProductInput> for Candidate<'a> {
    fn from(input: &'a ProductInput) -> Self {
        Self {
            name: input.name.as_deref(),
            description: input.description.as_deref(),
            category: input.category.as_deref(),
            brand: input.brand.as_deref(),
            price: input.price,
            stock: input.stock,
            rating: input.rating.unwrap_or(0.0),
        }
    }
}

impl<'a> From<&'a Product> for Candidate<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            name: Some(&product.name),
            description: Some(&product.description),
            category: Some(&product.category),
            brand: Some(&product.brand),
            price: Some(product.price),
            stock: Some(product.stock),
            rating: product.rating,
        }
    }
}

fn trimmed_len(value: Option<&str>) -> usize {
    value.map(|v| v.trim().chars().count()).unwrap_or(0)
}

pub fn validate(candidate: &Candidate<'_>) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if trimmed_len(candidate.name) < NAME_MIN_LEN {
        errors.push(ERR_NAME.to_string());
    }
    if trimmed_len(candidate.description) < DESCRIPTION_MIN_LEN {
        errors.push(ERR_DESCRIPTION.to_string());
    }
    if trimmed_len(candidate.category) == 0 {
        errors.push(ERR_CATEGORY.to_string());
    }
    if trimmed_len(candidate.brand) == 0 {
        errors.push(ERR_BRAND.to_string());
    }
    if !candidate
        .price
        .is_some_and(|price| price.is_finite() && price > 0.0)
    {
        errors.push(ERR_PRICE.to_string());
    }
    if !candidate.stock.is_some_and(|stock| stock >= 0) {
        errors.push(ERR_STOCK.to_string());
    }
    if !(0.0..=RATING_MAX).contains(&candidate.rating) {
        errors.push(ERR_RATING.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_product(product: &Product) -> Result<(), Vec<String>> {
    validate(&Candidate::from(product))
}
