use utoipa::OpenApi;

use crate::handlers::{categories, orders, products, users};

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::list_orders,
        orders::get_order,
        orders::total_sales,
        orders::order_count,
        orders::user_orders,
        orders::place_order,
        orders::update_order_status,
        orders::delete_order,
        products::list_products,
        products::get_product,
        products::product_count,
        products::featured_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        users::register,
        users::create_user,
        users::login,
        users::list_users,
        users::get_user,
        users::user_count,
        users::delete_user,
    ),
    tags(
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "products", description = "Product catalog"),
        (name = "categories", description = "Category catalog"),
        (name = "users", description = "User directory and authentication"),
    )
)]
pub struct ApiDoc;
