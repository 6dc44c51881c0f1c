pub mod application;
pub mod auth;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use auth::{AuthGate, TokenManager};
use handlers::{categories, orders, products, users};
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const API_BASE: &str = "/api/v1";

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    jwt_secret: &str,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let tokens = TokenManager::new(jwt_secret);

    Ok(HttpServer::new(move || {
        let order_service = OrderService::new(DieselOrderRepository::new(pool.clone()));
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(order_service))
            .app_data(web::Data::new(tokens.clone()))
            .wrap(AuthGate::new(tokens.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            .service(
                web::scope(API_BASE)
                    .service(
                        web::scope("/orders")
                            // Aggregate routes must be registered ahead of
                            // the `{id}` matcher.
                            .route("/get/totalSales", web::get().to(orders::total_sales))
                            .route("/get/orderCount", web::get().to(orders::order_count))
                            .route(
                                "/get/userOrders/{user_id}",
                                web::get().to(orders::user_orders),
                            )
                            .route("", web::get().to(orders::list_orders))
                            .route("", web::post().to(orders::place_order))
                            .route("/{id}", web::get().to(orders::get_order))
                            .route("/{id}", web::put().to(orders::update_order_status))
                            .route("/{id}", web::delete().to(orders::delete_order)),
                    )
                    .service(
                        web::scope("/products")
                            .route("/get/count", web::get().to(products::product_count))
                            .route(
                                "/get/featured/{count}",
                                web::get().to(products::featured_products),
                            )
                            .route("", web::get().to(products::list_products))
                            .route("", web::post().to(products::create_product))
                            .route("/{id}", web::get().to(products::get_product))
                            .route("/{id}", web::put().to(products::update_product))
                            .route("/{id}", web::delete().to(products::delete_product)),
                    )
                    .service(
                        web::scope("/categories")
                            .route("", web::get().to(categories::list_categories))
                            .route("", web::post().to(categories::create_category))
                            .route("/{id}", web::get().to(categories::get_category))
                            .route("/{id}", web::put().to(categories::update_category))
                            .route("/{id}", web::delete().to(categories::delete_category)),
                    )
                    .service(
                        web::scope("/users")
                            .route("/register", web::post().to(users::register))
                            .route("/login", web::post().to(users::login))
                            .route("/get/count", web::get().to(users::user_count))
                            .route("", web::get().to(users::list_users))
                            .route("", web::post().to(users::create_user))
                            .route("/{id}", web::get().to(users::get_user))
                            .route("/{id}", web::delete().to(users::delete_user)),
                    ),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
