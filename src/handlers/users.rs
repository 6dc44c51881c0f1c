use actix_web::{web, HttpResponse};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::TokenManager;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::infrastructure::models::{NewUserRow, UserRow};
use crate::schema::users;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    pub street: String,
    pub apartment: String,
    pub zip: String,
    pub city: String,
    pub country: String,
}

// The password hash never crosses this boundary.
impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            is_admin: row.is_admin,
            street: row.street,
            apartment: row.apartment,
            zip: row.zip,
            city: row.city,
            country: row.country,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub profile: RegisterRequest,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: String,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCountDto {
    pub user_count: i64,
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal("password hashing failed".to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AppError::Unauthorized)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)
}

fn insert_user(
    conn: &mut PgConnection,
    profile: RegisterRequest,
    is_admin: bool,
) -> Result<UserRow, AppError> {
    if profile.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }
    let row = NewUserRow {
        id: Uuid::new_v4(),
        name: profile.name,
        email: profile.email,
        password_hash: hash_password(&profile.password)?,
        phone: profile.phone,
        is_admin,
        street: profile.street,
        apartment: profile.apartment,
        zip: profile.zip,
        city: profile.city,
        country: profile.country,
    };
    diesel::insert_into(users::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => AppError::Validation("email is already registered".to_string()),
            other => other.into(),
        })?;
    Ok(users::table
        .find(row.id)
        .select(UserRow::as_select())
        .first(conn)?)
}

/// POST /api/v1/users/register
///
/// Open self-registration. Never creates an admin; admin accounts come from
/// the admin-gated POST /users.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn register(
    pool: web::Data<DbPool>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        insert_user(&mut conn, body, false)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserDto::from(row)))
}

/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn create_user(
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        insert_user(&mut conn, body.profile, body.is_admin)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserDto::from(row)))
}

/// POST /api/v1/users/login
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Bad credentials"),
    ),
    tag = "users"
)]
pub async fn login(
    pool: web::Data<DbPool>,
    tokens: web::Data<TokenManager>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let response = web::block(move || {
        let mut conn = pool.get()?;
        let user: Option<UserRow> = users::table
            .filter(users::email.eq(&body.email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(user) = user else {
            return Err(AppError::Unauthorized);
        };
        verify_password(&body.password, &user.password_hash)?;
        let token = tokens.issue(user.id, user.is_admin)?;
        Ok::<_, AppError>(LoginResponse {
            user: user.email,
            token,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses((status = 200, description = "All users", body = [UserDto])),
    tag = "users"
)]
pub async fn list_users(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::created_at.asc())
            .load(&mut conn)?;
        Ok::<_, AppError>(rows)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(UserDto::from).collect::<Vec<_>>()))
}

/// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        let row: Option<UserRow> = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok::<_, AppError>(row)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(UserDto::from(row))),
        None => Err(AppError::NotFound("user")),
    }
}

/// GET /api/v1/users/get/count
#[utoipa::path(
    get,
    path = "/api/v1/users/get/count",
    responses((status = 200, description = "Number of users", body = UserCountDto)),
    tag = "users"
)]
pub async fn user_count(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let count = web::block(move || {
        let mut conn = pool.get()?;
        let count: i64 = users::table.count().get_result(&mut conn)?;
        Ok::<_, AppError>(count)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(UserCountDto { user_count: count }))
}

/// DELETE /api/v1/users/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "User still has orders"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let removed = web::block(move || {
        let mut conn = pool.get()?;
        let removed = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => AppError::Validation("user still has orders".to_string()),
                other => other.into(),
            })?;
        Ok::<_, AppError>(removed)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if removed == 1 {
        Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "user deleted" })))
    } else {
        Ok(HttpResponse::NotFound().json(json!({ "success": false, "message": "user not found" })))
    }
}
