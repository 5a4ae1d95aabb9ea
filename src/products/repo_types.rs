use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stock status, stored as TEXT in its wire spelling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Stock {
    #[serde(rename = "IN STOCK")]
    InStock,
    #[serde(rename = "OUT OF STOCK")]
    OutOfStock,
    #[serde(rename = "NO INFO")]
    NoInfo,
}

impl Stock {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stock::InStock => "IN STOCK",
            Stock::OutOfStock => "OUT OF STOCK",
            Stock::NoInfo => "NO INFO",
        }
    }
}

/// Product record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub photo: String,
    pub quantity: i32,
    pub price_per_unit: f64,
    pub stock: String,
    pub description: String,
    pub added_by: Option<Uuid>,
    pub slug: String,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_serializes_to_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&Stock::OutOfStock).unwrap(),
            r#""OUT OF STOCK""#
        );
        let parsed: Stock = serde_json::from_str(r#""IN STOCK""#).unwrap();
        assert_eq!(parsed, Stock::InStock);
        assert!(serde_json::from_str::<Stock>(r#""SOLD OUT""#).is_err());
    }
}
