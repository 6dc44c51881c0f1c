use std::time::Duration;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, OrderDetail, OrderItemRequest, OrderSummary, ShippingDetails,
};
use crate::errors::AppError;
use crate::handlers::categories::CategoryDto;
use crate::infrastructure::order_repo::DieselOrderRepository;

/// The concrete order service handed to the HTTP layer.
pub type Orders = OrderService<DieselOrderRepository>;

/// Deadline for multi-record writes; the transaction guarantees an abandoned
/// attempt cannot half-commit.
const WRITE_DEADLINE: Duration = Duration::from_secs(30);

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequestDto {
    /// Product id.
    pub product: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub order_items: Vec<OrderItemRequestDto>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    #[serde(default = "default_status")]
    pub status: String,
    /// User id placing the order.
    pub user: Uuid,
    #[serde(default)]
    pub date_ordered: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "Pending".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummaryDto {
    pub id: Uuid,
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub category: CategoryDto,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: Uuid,
    /// `null` when the product has since been removed from the catalog.
    pub product: Option<ProductSummaryDto>,
    pub quantity: i32,
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailDto {
    pub id: Uuid,
    pub order_items: Vec<OrderItemDto>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: String,
    pub total_price: String,
    pub user: UserSummaryDto,
    pub date_ordered: String,
}

/// Listing shape: line items as ids only, user expanded to a display name.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    pub id: Uuid,
    pub order_items: Vec<Uuid>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: String,
    pub total_price: String,
    pub user: UserSummaryDto,
    pub date_ordered: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalSalesDto {
    pub totalsales: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCountDto {
    pub order_count: i64,
}

impl From<OrderDetail> for OrderDetailDto {
    fn from(order: OrderDetail) -> Self {
        Self {
            id: order.id,
            order_items: order
                .items
                .into_iter()
                .map(|item| OrderItemDto {
                    id: item.id,
                    product: item.product.map(|p| ProductSummaryDto {
                        id: p.id,
                        name: p.name,
                        price: p.price.to_string(),
                        category: CategoryDto::from(p.category),
                    }),
                    quantity: item.quantity,
                    unit_price: item.unit_price.to_string(),
                })
                .collect(),
            shipping_address1: order.shipping.address1,
            shipping_address2: order.shipping.address2,
            city: order.shipping.city,
            zip: order.shipping.zip,
            country: order.shipping.country,
            phone: order.shipping.phone,
            status: order.status,
            total_price: order.total_price.to_string(),
            user: UserSummaryDto {
                id: order.user.id,
                name: order.user.name,
            },
            date_ordered: order.date_ordered.to_rfc3339(),
        }
    }
}

impl From<OrderSummary> for OrderSummaryDto {
    fn from(order: OrderSummary) -> Self {
        Self {
            id: order.id,
            order_items: order.item_ids,
            shipping_address1: order.shipping.address1,
            shipping_address2: order.shipping.address2,
            city: order.shipping.city,
            zip: order.shipping.zip,
            country: order.shipping.country,
            phone: order.shipping.phone,
            status: order.status,
            total_price: order.total_price.to_string(),
            user: UserSummaryDto {
                id: order.user.id,
                name: order.user.name,
            },
            date_ordered: order.date_ordered.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses((status = 200, description = "All orders, most recent first", body = [OrderSummaryDto])),
    tag = "orders"
)]
pub async fn list_orders(service: web::Data<Orders>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || service.list_orders())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(
        orders
            .into_iter()
            .map(OrderSummaryDto::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/v1/orders/{id}
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with user, products and categories expanded", body = OrderDetailDto),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = web::block(move || service.get_order(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderDetailDto::from(order)))
}

/// GET /api/v1/orders/get/totalSales
#[utoipa::path(
    get,
    path = "/api/v1/orders/get/totalSales",
    responses((status = 200, description = "Sum of all order totals; 0 when there are no orders", body = TotalSalesDto)),
    tag = "orders"
)]
pub async fn total_sales(service: web::Data<Orders>) -> Result<HttpResponse, AppError> {
    let total = web::block(move || service.total_sales())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(TotalSalesDto {
        totalsales: total.to_string(),
    }))
}

/// GET /api/v1/orders/get/orderCount
#[utoipa::path(
    get,
    path = "/api/v1/orders/get/orderCount",
    responses((status = 200, description = "Number of orders", body = OrderCountDto)),
    tag = "orders"
)]
pub async fn order_count(service: web::Data<Orders>) -> Result<HttpResponse, AppError> {
    let count = web::block(move || service.order_count())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderCountDto { order_count: count }))
}

/// GET /api/v1/orders/get/userOrders/{userId}
#[utoipa::path(
    get,
    path = "/api/v1/orders/get/userOrders/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "The user's orders, most recent first", body = [OrderDetailDto])),
    tag = "orders"
)]
pub async fn user_orders(
    service: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let orders = web::block(move || service.user_orders(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(
        orders
            .into_iter()
            .map(OrderDetailDto::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/v1/orders
///
/// Places an order: line items are materialized from the submitted
/// `{product, quantity}` list and the total is computed server-side from
/// catalog prices, all inside one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderDetailDto),
        (status = 400, description = "Empty item list, unknown product, or bad quantity"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    service: web::Data<Orders>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = NewOrder {
        items: body
            .order_items
            .iter()
            .map(|item| OrderItemRequest {
                product_id: item.product,
                quantity: item.quantity,
            })
            .collect(),
        shipping: ShippingDetails {
            address1: body.shipping_address1,
            address2: body.shipping_address2,
            city: body.city,
            zip: body.zip,
            country: body.country,
            phone: body.phone,
        },
        status: body.status,
        user_id: body.user,
        date_ordered: body.date_ordered,
    };

    let created = tokio::time::timeout(
        WRITE_DEADLINE,
        web::block(move || service.place_order(order)),
    )
    .await
    .map_err(|_| AppError::Timeout)?
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderDetailDto::from(created)))
}

/// PUT /api/v1/orders/{id}
///
/// Updates the status label. Any string is accepted; no transition rules are
/// enforced.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Order with the new status", body = OrderSummaryDto),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<Orders>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    let updated = web::block(move || service.update_status(id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderSummaryDto::from(updated)))
}

/// DELETE /api/v1/orders/{id}
///
/// Cascade delete: every line item goes with the order. A partial cascade is
/// reported as a failure, never as success.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order and its line items deleted"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<Orders>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = tokio::time::timeout(
        WRITE_DEADLINE,
        web::block(move || service.delete_order(id)),
    )
    .await
    .map_err(|_| AppError::Timeout)?
    .map_err(|e| AppError::Internal(e.to_string()))?;

    match result {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "order deleted" })))
        }
        Err(DomainError::NotFound(_)) => Ok(HttpResponse::NotFound()
            .json(json!({ "success": false, "message": "order not found" }))),
        Err(e) => Err(e.into()),
    }
}
