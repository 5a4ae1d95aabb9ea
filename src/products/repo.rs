use sqlx::PgPool;
use uuid::Uuid;

use crate::products::repo_types::Product;

/// Column values for an insert or full-row update; merging partial input
/// into these happens in the handler.
pub struct ProductRecord<'a> {
    pub name: &'a str,
    pub photo: &'a str,
    pub quantity: i32,
    pub price_per_unit: f64,
    pub stock: &'a str,
    pub description: &'a str,
    pub slug: &'a str,
}

impl Product {
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, photo, quantity, price_per_unit, stock,
                   description, added_by, slug, created_at
            FROM products
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, photo, quantity, price_per_unit, stock,
                   description, added_by, slug, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        record: ProductRecord<'_>,
        added_by: Uuid,
    ) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, photo, quantity, price_per_unit, stock,
                                  description, added_by, slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, photo, quantity, price_per_unit, stock,
                      description, added_by, slug, created_at
            "#,
        )
        .bind(record.name)
        .bind(record.photo)
        .bind(record.quantity)
        .bind(record.price_per_unit)
        .bind(record.stock)
        .bind(record.description)
        .bind(added_by)
        .bind(record.slug)
        .fetch_one(db)
        .await
    }

    /// Full-row update with values the handler already merged and validated.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        record: ProductRecord<'_>,
    ) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, photo = $3, quantity = $4, price_per_unit = $5,
                stock = $6, description = $7, slug = $8
            WHERE id = $1
            RETURNING id, name, photo, quantity, price_per_unit, stock,
                      description, added_by, slug, created_at
            "#,
        )
        .bind(id)
        .bind(record.name)
        .bind(record.photo)
        .bind(record.quantity)
        .bind(record.price_per_unit)
        .bind(record.stock)
        .bind(record.description)
        .bind(record.slug)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
