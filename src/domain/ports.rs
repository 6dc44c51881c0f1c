use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{NewOrder, OrderDetail, OrderSummary};

/// Storage port for the order aggregate and its line items.
///
/// `create` and `delete` are multi-record operations and must be atomic:
/// either the order and all of its line items are persisted/removed, or
/// nothing is.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<OrderDetail, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetail>, DomainError>;
    fn list(&self) -> Result<Vec<OrderSummary>, DomainError>;
    fn list_by_user(&self, user_id: Uuid) -> Result<Vec<OrderDetail>, DomainError>;
    fn update_status(&self, id: Uuid, status: String) -> Result<Option<OrderSummary>, DomainError>;
    /// Cascade-delete the order and its line items. Returns `false` when the
    /// order does not exist.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
    fn total_sales(&self) -> Result<BigDecimal, DomainError>;
}
