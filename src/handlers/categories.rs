use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::order::CategorySummary;
use crate::errors::AppError;
use crate::infrastructure::models::{CategoryRow, NewCategoryRow};
use crate::schema::categories;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<CategoryRow> for CategoryDto {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            icon: row.icon,
            color: row.color,
        }
    }
}

impl From<CategorySummary> for CategoryDto {
    fn from(summary: CategorySummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            icon: summary.icon,
            color: summary.color,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// GET /api/v1/categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses((status = 200, description = "All categories", body = [CategoryDto])),
    tag = "categories"
)]
pub async fn list_categories(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order(categories::name.asc())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(CategoryDto::from).collect::<Vec<_>>()))
}

/// GET /api/v1/categories/{id}
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryDto),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        let row: Option<CategoryRow> = categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok::<_, AppError>(row)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(CategoryDto::from(row))),
        None => Err(AppError::NotFound("category")),
    }
}

/// POST /api/v1/categories
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = UpsertCategoryRequest,
    responses((status = 201, description = "Category created", body = CategoryDto)),
    tag = "categories"
)]
pub async fn create_category(
    pool: web::Data<DbPool>,
    body: web::Json<UpsertCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        let row = NewCategoryRow {
            id: Uuid::new_v4(),
            name: body.name,
            icon: body.icon,
            color: body.color,
        };
        diesel::insert_into(categories::table)
            .values(&row)
            .execute(&mut conn)?;
        let created: CategoryRow = categories::table
            .find(row.id)
            .select(CategoryRow::as_select())
            .first(&mut conn)?;
        Ok::<_, AppError>(created)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CategoryDto::from(row)))
}

/// PUT /api/v1/categories/{id}
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = UpsertCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpsertCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        // Explicit tuple so a `None` clears the column instead of being
        // skipped the way an `AsChangeset` option would be.
        let updated: Option<CategoryRow> = diesel::update(categories::table.find(id))
            .set((
                categories::name.eq(body.name),
                categories::icon.eq(body.icon),
                categories::color.eq(body.color),
            ))
            .get_result::<CategoryRow>(&mut conn)
            .optional()?;
        Ok::<_, AppError>(updated)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(CategoryDto::from(row))),
        None => Err(AppError::NotFound("category")),
    }
}

/// DELETE /api/v1/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let removed = web::block(move || {
        let mut conn = pool.get()?;
        let removed = diesel::delete(categories::table.find(id))
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => AppError::Validation("category is still referenced by products".to_string()),
                other => other.into(),
            })?;
        Ok::<_, AppError>(removed)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if removed == 1 {
        Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "category deleted" })))
    } else {
        Ok(HttpResponse::NotFound()
            .json(json!({ "success": false, "message": "category not found" })))
    }
}
