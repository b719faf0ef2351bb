// tests/api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use serde_json::{json, Value};

use olira_storefront::pipelines::sign_in_with_password;
use olira_storefront::realtime::{ChangeOp, OrderChange};
use olira_storefront::web::configure_app_routes;
use olira_storefront::web::extractors::CART_SESSION_HEADER;
use olira_storefront::web::handlers::admin_handlers::sse_frame;

macro_rules! service {
  ($app:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($app.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_is_ok() {
  let app = test_app();
  let service = service!(app);
  let body: Value = test::call_and_read_body_json(&service, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn cart_session_round_trip() {
  let app = test_app();
  let kurti = insert_product(app.state.backend.as_ref(), product("Sage Kurti", 1200, None)).await;
  let service = service!(app);

  let resp = test::call_service(&service, test::TestRequest::get().uri("/api/v1/cart").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let session = resp
    .headers()
    .get(CART_SESSION_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string)
    .expect("session header echoed");

  let add = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .set_json(json!({ "product_id": kurti.id, "size": "M" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, add).await;
  assert_eq!(body["cart"]["total"], 1200);
  assert_eq!(body["cart"]["drawer_open"], true);
  let cart_id = body["line"]["cartId"].as_str().unwrap().to_string();

  let bump = test::TestRequest::patch()
    .uri(&format!("/api/v1/cart/items/{cart_id}"))
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .set_json(json!({ "delta": 2 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, bump).await;
  assert_eq!(body["item_count"], 3);
  assert_eq!(body["total"], 3600);

  let no_size = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .set_json(json!({ "product_id": kurti.id }))
    .to_request();
  assert_eq!(test::call_service(&service, no_size).await.status(), StatusCode::BAD_REQUEST);

  let clear = test::TestRequest::delete()
    .uri("/api/v1/cart")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, clear).await;
  assert_eq!(body["lines"], json!([]));
}

#[actix_web::test]
async fn checkout_over_http_creates_an_order() {
  let app = test_app();
  let top = insert_product(app.state.backend.as_ref(), product("Wrap Top", 800, None)).await;
  let session = uuid::Uuid::new_v4().to_string();
  let service = service!(app);

  let empty = test::TestRequest::get()
    .uri("/api/v1/checkout")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, empty).await;
  assert_eq!(body["empty"], true);

  let add = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .set_json(json!({ "product_id": top.id, "size": "S", "quantity": 2 }))
    .to_request();
  test::call_service(&service, add).await;

  let summary = test::TestRequest::get()
    .uri("/api/v1/checkout")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, summary).await;
  assert_eq!(body["empty"], false);
  assert_eq!(body["shipping"], "Free");
  assert_eq!(body["total"], 1600);

  let submit = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header((CART_SESSION_HEADER, session.as_str()))
    .set_json(json!({
      "full_name": "Asha Rao",
      "email": "asha@example.com",
      "phone": "9876543210",
      "address": "12 Lake Road",
      "city": "Kochi",
      "pincode": "682001"
    }))
    .to_request();
  let resp = test::call_service(&service, submit).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["total"], 1600);
  let number = body["order_number"].as_str().unwrap().to_string();

  let track: Value = test::call_and_read_body_json(
    &service,
    test::TestRequest::get().uri(&format!("/api/v1/orders/{number}")).to_request(),
  )
  .await;
  assert_eq!(track["order_status"], "PENDING");

  let missing = test::TestRequest::get().uri("/api/v1/orders/ORD-999999").to_request();
  assert_eq!(test::call_service(&service, missing).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_routes_require_a_session() {
  let app = test_app_with_admin().await;
  let service = service!(app);

  let resp = test::call_service(&service, test::TestRequest::get().uri("/api/v1/admin/dashboard").to_request()).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["redirect"], "/admin/login");

  let bad_login = test::TestRequest::post()
    .uri("/api/v1/admin/login")
    .set_json(json!({ "email": ADMIN_EMAIL, "password": "nope" }))
    .to_request();
  let resp = test::call_service(&service, bad_login).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Invalid login credentials");

  let login = test::TestRequest::post()
    .uri("/api/v1/admin/login")
    .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, login).await;
  let bearer = format!("Bearer {}", body["access_token"].as_str().unwrap());

  let dashboard = test::TestRequest::get()
    .uri("/api/v1/admin/dashboard")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let stats: Value = test::call_and_read_body_json(&service, dashboard).await;
  assert_eq!(stats["total_orders"], 0);

  let reset = test::TestRequest::post()
    .uri("/api/v1/admin/categories/reset")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, reset).await;
  assert_eq!(body["inserted"], 5);

  let logout = test::TestRequest::post()
    .uri("/api/v1/admin/logout")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, logout).await;
  assert_eq!(body["redirect"], "/admin/login");

  let after = test::TestRequest::get()
    .uri("/api/v1/admin/session")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  assert_eq!(test::call_service(&service, after).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn content_pages_and_whatsapp_link() {
  let app = test_app();
  let service = service!(app);

  let faq: Value = test::call_and_read_body_json(&service, test::TestRequest::get().uri("/api/v1/pages/faq").to_request()).await;
  assert_eq!(faq["slug"], "faq");
  let missing = test::TestRequest::get().uri("/api/v1/pages/careers").to_request();
  assert_eq!(test::call_service(&service, missing).await.status(), StatusCode::NOT_FOUND);

  let link: Value =
    test::call_and_read_body_json(&service, test::TestRequest::get().uri("/api/v1/contact/whatsapp").to_request()).await;
  assert!(link["url"].as_str().unwrap().starts_with("https://wa.me/919876543210?text=Hi%20Oliraa"));
}

#[actix_web::test]
async fn change_frames_use_event_stream_format() {
  let frame = sse_frame("order_change", &json!({ "op": "INSERT" }));
  assert_eq!(&frame[..], b"event: order_change\ndata: {\"op\":\"INSERT\"}\n\n");
}

#[actix_web::test]
async fn change_stream_forwards_changes_then_redirects_on_sign_out() {
  let app = test_app_with_admin().await;
  let state = app.state.clone();
  let session = sign_in_with_password(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
  let service = service!(app);

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders/changes")
    .insert_header(("Authorization", format!("Bearer {}", session.access_token)))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers().get("content-type").unwrap(), "text/event-stream");

  let change = OrderChange::new(ChangeOp::Insert, uuid::Uuid::new_v4());
  state.feed.publish(change.clone());
  assert!(state.auth.sign_out(&session.access_token));

  // The stream ends after the redirect, so the whole body can be read.
  let body = test::read_body(resp).await;
  let expected = [
    sse_frame("order_change", &serde_json::to_value(&change).unwrap()),
    sse_frame("redirect", &json!({ "redirect": "/admin/login" })),
  ]
  .concat();
  assert_eq!(&body[..], &expected[..]);
}

#[actix_web::test]
async fn anonymous_reads_do_not_open_carts() {
  let app = test_app();
  let state = app.state.clone();
  let service = service!(app);

  for uri in ["/api/v1/cart", "/api/v1/checkout"] {
    for _ in 0..20 {
      let resp = test::call_service(&service, test::TestRequest::get().uri(uri).to_request()).await;
      assert_eq!(resp.status(), StatusCode::OK);
      assert!(resp.headers().contains_key(CART_SESSION_HEADER));
    }
  }
  assert_eq!(state.carts.open_sessions(), 0);
}
