use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::handlers::categories::CategoryDto;
use crate::infrastructure::models::{CategoryRow, NewProductRow, ProductRow};
use crate::schema::{categories, products};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    pub images: Vec<String>,
    pub brand: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub category: CategoryDto,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub date_created: String,
}

impl From<(ProductRow, CategoryRow)> for ProductDto {
    fn from((product, category): (ProductRow, CategoryRow)) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            rich_description: product.rich_description,
            image: product.image,
            images: product.images,
            brand: product.brand,
            price: product.price.to_string(),
            category: CategoryDto::from(category),
            count_in_stock: product.count_in_stock,
            rating: product.rating,
            num_reviews: product.num_reviews,
            is_featured: product.is_featured,
            date_created: product.date_created.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rich_description: String,
    /// Image URL; file storage itself lives behind an external collaborator.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub brand: String,
    pub price: String,
    pub category: Uuid,
    #[serde(default)]
    pub count_in_stock: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductFilter {
    /// Comma-separated category ids, e.g. `?categories=a,b`.
    pub categories: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCountDto {
    pub product_count: i64,
}

fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw).map_err(|_| AppError::Validation(format!("invalid price '{raw}'")))
}

fn row_from(body: UpsertProductRequest, id: Uuid) -> Result<NewProductRow, AppError> {
    let price = parse_price(&body.price)?;
    Ok(NewProductRow {
        id,
        name: body.name,
        description: body.description,
        rich_description: body.rich_description,
        image: body.image,
        images: body.images,
        brand: body.brand,
        price,
        category_id: body.category,
        count_in_stock: body.count_in_stock,
        rating: body.rating,
        num_reviews: body.num_reviews,
        is_featured: body.is_featured,
    })
}

fn check_category(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
    let known: i64 = categories::table
        .filter(categories::id.eq(id))
        .count()
        .get_result(conn)?;
    if known == 0 {
        return Err(AppError::Validation("invalid category".to_string()));
    }
    Ok(())
}

fn load_with_category(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<(ProductRow, CategoryRow)>, AppError> {
    Ok(products::table
        .inner_join(categories::table)
        .filter(products::id.eq(id))
        .select((ProductRow::as_select(), CategoryRow::as_select()))
        .first(conn)
        .optional()?)
}

/// GET /api/v1/products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(("categories" = Option<String>, Query, description = "Comma-separated category ids")),
    responses((status = 200, description = "Products, optionally filtered by category", body = [ProductDto])),
    tag = "products"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<ProductFilter>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner();
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let mut q = products::table.inner_join(categories::table).into_boxed();
        if let Some(csv) = &filter.categories {
            let ids: Vec<Uuid> = csv
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    Uuid::parse_str(s.trim())
                        .map_err(|_| AppError::Validation(format!("invalid category id '{s}'")))
                })
                .collect::<Result<_, _>>()?;
            q = q.filter(products::category_id.eq_any(ids));
        }
        let rows: Vec<(ProductRow, CategoryRow)> = q
            .select((ProductRow::as_select(), CategoryRow::as_select()))
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(ProductDto::from).collect::<Vec<_>>()))
}

/// GET /api/v1/products/{id}
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        load_with_category(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(ProductDto::from(row))),
        None => Err(AppError::NotFound("product")),
    }
}

/// GET /api/v1/products/get/count
#[utoipa::path(
    get,
    path = "/api/v1/products/get/count",
    responses((status = 200, description = "Number of products", body = ProductCountDto)),
    tag = "products"
)]
pub async fn product_count(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let count = web::block(move || {
        let mut conn = pool.get()?;
        let count: i64 = products::table.count().get_result(&mut conn)?;
        Ok::<_, AppError>(count)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductCountDto {
        product_count: count,
    }))
}

/// GET /api/v1/products/get/featured/{count}
#[utoipa::path(
    get,
    path = "/api/v1/products/get/featured/{count}",
    params(("count" = i64, Path, description = "Maximum number of featured products")),
    responses((status = 200, description = "Featured products", body = [ProductDto])),
    tag = "products"
)]
pub async fn featured_products(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let count = path.into_inner().max(0);
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<(ProductRow, CategoryRow)> = products::table
            .inner_join(categories::table)
            .filter(products::is_featured.eq(true))
            .limit(count)
            .select((ProductRow::as_select(), CategoryRow::as_select()))
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(ProductDto::from).collect::<Vec<_>>()))
}

/// POST /api/v1/products
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = UpsertProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid category or price"),
    ),
    tag = "products"
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<UpsertProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        check_category(&mut conn, body.category)?;
        let row = row_from(body, Uuid::new_v4())?;
        diesel::insert_into(products::table)
            .values(&row)
            .execute(&mut conn)?;
        load_with_category(&mut conn, row.id)?
            .ok_or_else(|| AppError::Internal("product vanished after insert".to_string()))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductDto::from(row)))
}

/// PUT /api/v1/products/{id}
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpsertProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Invalid category or price"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpsertProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        check_category(&mut conn, body.category)?;
        let changes = row_from(body, id)?;
        let updated = diesel::update(products::table.find(id))
            .set(&changes)
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(AppError::NotFound("product"));
        }
        load_with_category(&mut conn, id)?
            .ok_or_else(|| AppError::Internal("product vanished after update".to_string()))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductDto::from(row)))
}

/// DELETE /api/v1/products/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let removed = web::block(move || {
        let mut conn = pool.get()?;
        let removed = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok::<_, AppError>(removed)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if removed == 1 {
        Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "product deleted" })))
    } else {
        Ok(HttpResponse::NotFound().json(json!({ "success": false, "message": "product not found" })))
    }
}
