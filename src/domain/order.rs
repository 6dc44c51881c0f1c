use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One `{product, quantity}` entry of a placement request, before the
/// catalog has been consulted.
#[derive(Debug, Clone)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

/// Everything needed to place an order. `date_ordered` falls back to the
/// store's clock when absent.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderItemRequest>,
    pub shipping: ShippingDetails,
    pub status: String,
    pub user_id: Uuid,
    pub date_ordered: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub category: CategorySummary,
}

#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
}

/// A line item with its product reference resolved for display. The product
/// is `None` when it has been removed from the catalog since placement; the
/// unit-price snapshot taken at placement time is kept either way.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product: Option<ProductSummary>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// Fully expanded order: user display name plus every line item with its
/// product and category, in submission order.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub id: Uuid,
    pub items: Vec<OrderItemView>,
    pub shipping: ShippingDetails,
    pub status: String,
    pub total_price: BigDecimal,
    pub user: UserSummary,
    pub date_ordered: DateTime<Utc>,
}

/// Listing shape: user expanded, line items as identifiers only.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: Uuid,
    pub item_ids: Vec<Uuid>,
    pub shipping: ShippingDetails,
    pub status: String,
    pub total_price: BigDecimal,
    pub user: UserSummary,
    pub date_ordered: DateTime<Utc>,
}
