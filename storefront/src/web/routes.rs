// storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  admin_handlers, auth_handlers, cart_handlers, catalog_handlers, checkout_handlers, content_handlers,
};

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(content_handlers::health_handler))
      // Storefront
      .route("/categories", web::get().to(catalog_handlers::list_categories_handler))
      .route("/shop", web::get().to(catalog_handlers::shop_handler))
      .route("/shop/{collection}", web::get().to(catalog_handlers::collection_handler))
      .route("/products/{slug}", web::get().to(catalog_handlers::product_detail_handler))
      .route("/search", web::get().to(catalog_handlers::search_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{cart_id}", web::patch().to(cart_handlers::update_quantity_handler))
          .route("/items/{cart_id}", web::delete().to(cart_handlers::remove_line_handler))
          .route("/drawer", web::put().to(cart_handlers::set_drawer_handler)),
      )
      .service(
        web::scope("/checkout")
          .route("", web::get().to(checkout_handlers::checkout_summary_handler))
          .route("", web::post().to(checkout_handlers::place_order_handler)),
      )
      .route("/orders/{order_number}", web::get().to(content_handlers::track_order_handler))
      .route("/pages/{slug}", web::get().to(content_handlers::content_page_handler))
      .route("/contact/whatsapp", web::get().to(content_handlers::whatsapp_handler))
      // Admin
      .service(
        web::scope("/admin")
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/logout", web::post().to(auth_handlers::logout_handler))
          .route("/session", web::get().to(auth_handlers::session_handler))
          .route("/dashboard", web::get().to(admin_handlers::dashboard_handler))
          .route("/products", web::get().to(admin_handlers::list_products_handler))
          .route("/products", web::post().to(admin_handlers::save_product_handler))
          .route("/products/blank", web::get().to(admin_handlers::blank_product_handler))
          .route("/products/{id}", web::delete().to(admin_handlers::delete_product_handler))
          .route("/categories", web::get().to(admin_handlers::list_categories_handler))
          .route("/categories/reset", web::post().to(admin_handlers::reset_categories_handler))
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route("/orders/changes", web::get().to(admin_handlers::order_changes_handler))
          .route("/orders/{id}", web::patch().to(admin_handlers::update_order_handler))
          .route("/orders/{id}", web::delete().to(admin_handlers::delete_order_handler)),
      ),
  );
}
