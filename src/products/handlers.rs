use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::ApiError,
    products::{
        dto::{CreateProductRequest, Pagination, UpdateProductRequest},
        repo::ProductRecord,
        repo_types::{Product, Stock},
        service::{slugify, validate_fields},
    },
    response::ApiResponse,
    state::AppState,
};

const DEFAULT_PHOTO: &str = "no_photo.jpg";

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = Product::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(ApiResponse::list(products.len(), products)))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok(product)))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    validate_fields(
        &payload.name,
        payload.quantity,
        payload.price_per_unit,
        &payload.description,
    )?;

    let slug = slugify(&payload.name);
    let record = ProductRecord {
        name: &payload.name,
        photo: payload.photo.as_deref().unwrap_or(DEFAULT_PHOTO),
        quantity: payload.quantity,
        price_per_unit: payload.price_per_unit,
        stock: payload.stock.unwrap_or(Stock::NoInfo).as_str(),
        description: &payload.description,
        slug: &slug,
    };
    let product = Product::create(&state.db, record, user_id).await?;

    info!(product_id = %product.id, user_id = %user_id, "product created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let AdminUser(caller) = admin;

    let existing = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with id of {}", id)))?;

    // Merge the partial update, then re-validate the whole row.
    let name = payload.name.as_deref().unwrap_or(&existing.name);
    let photo = payload.photo.as_deref().unwrap_or(&existing.photo);
    let quantity = payload.quantity.unwrap_or(existing.quantity);
    let price_per_unit = payload.price_per_unit.unwrap_or(existing.price_per_unit);
    let stock = payload
        .stock
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|| existing.stock.clone());
    let description = payload.description.as_deref().unwrap_or(&existing.description);

    validate_fields(name, quantity, price_per_unit, description)?;

    // The slug follows the name.
    let slug = if payload.name.is_some() {
        slugify(name)
    } else {
        existing.slug.clone()
    };

    let record = ProductRecord {
        name,
        photo,
        quantity,
        price_per_unit,
        stock: &stock,
        description,
        slug: &slug,
    };
    let product = Product::update(&state.db, id, record)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found with id of {}", id)))?;

    info!(product_id = %product.id, admin_id = %caller.id, "product updated");
    Ok(Json(ApiResponse::ok(product)))
}

#[instrument(skip(state, admin))]
pub async fn delete_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let AdminUser(caller) = admin;

    if !Product::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!(
            "Product not found with id of {}",
            id
        )));
    }

    info!(product_id = %id, admin_id = %caller.id, "product deleted");
    Ok(Json(ApiResponse::ok(format!(
        "Deleted product with id of: {}",
        id
    ))))
}
