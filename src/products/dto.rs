use serde::Deserialize;

use crate::products::repo_types::Stock;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub quantity: i32,
    pub price_per_unit: f64,
    pub description: String,
    pub photo: Option<String>,
    pub stock: Option<Stock>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub price_per_unit: Option<f64>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub stock: Option<Stock>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
