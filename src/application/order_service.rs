use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderDetail, OrderSummary};
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Place an order. Request-shape validation happens here; referential
    /// checks (user, products) and pricing happen inside the repository's
    /// transaction.
    pub fn place_order(&self, order: NewOrder) -> Result<OrderDetail, DomainError> {
        if order.items.is_empty() {
            return Err(DomainError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }
        if order.shipping.address1.trim().is_empty() {
            return Err(DomainError::Validation(
                "shippingAddress1 is required".to_string(),
            ));
        }
        self.repo.create(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderDetail, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("order"))
    }

    pub fn list_orders(&self) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.list()
    }

    pub fn user_orders(&self, user_id: Uuid) -> Result<Vec<OrderDetail>, DomainError> {
        self.repo.list_by_user(user_id)
    }

    /// Any string is accepted as a status; there is no enforced state
    /// machine.
    pub fn update_status(&self, id: Uuid, status: String) -> Result<OrderSummary, DomainError> {
        self.repo
            .update_status(id, status)?
            .ok_or(DomainError::NotFound("order"))
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound("order"))
        }
    }

    pub fn order_count(&self) -> Result<i64, DomainError> {
        self.repo.count()
    }

    /// Sum of `total_price` over all orders; zero when there are none.
    pub fn total_sales(&self) -> Result<BigDecimal, DomainError> {
        self.repo.total_sales()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;
    use crate::domain::order::{OrderItemRequest, ShippingDetails};

    /// Counts calls so tests can assert the store was never touched when
    /// validation fails at the service boundary.
    #[derive(Default)]
    struct CountingRepo {
        creates: AtomicUsize,
    }

    impl OrderRepository for CountingRepo {
        fn create(&self, _order: NewOrder) -> Result<OrderDetail, DomainError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::Internal("not under test".to_string()))
        }

        fn find_by_id(&self, _id: Uuid) -> Result<Option<OrderDetail>, DomainError> {
            Ok(None)
        }

        fn list(&self) -> Result<Vec<OrderSummary>, DomainError> {
            Ok(vec![])
        }

        fn list_by_user(&self, _user_id: Uuid) -> Result<Vec<OrderDetail>, DomainError> {
            Ok(vec![])
        }

        fn update_status(
            &self,
            _id: Uuid,
            _status: String,
        ) -> Result<Option<OrderSummary>, DomainError> {
            Ok(None)
        }

        fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
            Ok(false)
        }

        fn count(&self) -> Result<i64, DomainError> {
            Ok(0)
        }

        fn total_sales(&self) -> Result<BigDecimal, DomainError> {
            Ok(BigDecimal::from(0))
        }
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            address1: "1 Main St".to_string(),
            address2: None,
            city: "Springfield".to_string(),
            zip: "12345".to_string(),
            country: "US".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn new_order(items: Vec<OrderItemRequest>, shipping: ShippingDetails) -> NewOrder {
        NewOrder {
            items,
            shipping,
            status: "Pending".to_string(),
            user_id: Uuid::new_v4(),
            date_ordered: Some(Utc::now()),
        }
    }

    #[test]
    fn empty_item_list_is_rejected_before_the_store_is_touched() {
        let repo = CountingRepo::default();
        let service = OrderService::new(repo);

        let err = service
            .place_order(new_order(vec![], shipping()))
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(service.repo.creates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn blank_shipping_address_is_rejected() {
        let repo = CountingRepo::default();
        let service = OrderService::new(repo);
        let mut shipping = shipping();
        shipping.address1 = "   ".to_string();

        let items = vec![OrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 1,
        }];
        let err = service.place_order(new_order(items, shipping)).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(service.repo.creates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_order_surfaces_as_not_found() {
        let service = OrderService::new(CountingRepo::default());

        assert!(matches!(
            service.get_order(Uuid::new_v4()),
            Err(DomainError::NotFound("order"))
        ));
        assert!(matches!(
            service.update_status(Uuid::new_v4(), "Shipped".to_string()),
            Err(DomainError::NotFound("order"))
        ));
        assert!(matches!(
            service.delete_order(Uuid::new_v4()),
            Err(DomainError::NotFound("order"))
        ));
    }

    #[test]
    fn total_sales_on_empty_store_is_zero_not_an_error() {
        let service = OrderService::new(CountingRepo::default());
        assert_eq!(service.total_sales().expect("should succeed"), BigDecimal::from(0));
    }
}
