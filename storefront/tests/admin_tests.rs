// tests/admin_tests.rs
mod common;

use common::*;
use olira_storefront::admin::products::{LINKED_CATEGORY_WARNING, UNCATEGORIZED};
use olira_storefront::admin::{DashboardStats, StatusTab, STANDARD_CATEGORIES};
use olira_storefront::backend::Backend;
use olira_storefront::errors::AppError;
use olira_storefront::models::{NewOrder, Order, OrderStatus, OrderStatusUpdate, PaymentMethod, PaymentStatus, ProductDraft};
use serial_test::serial;
use std::time::Duration;

fn new_order(number: &str, name: &str, phone: &str, total: i64) -> NewOrder {
  NewOrder {
    order_number: number.to_string(),
    customer_name: name.to_string(),
    phone: phone.to_string(),
    address: "1 Main Road, Pune - 411001".to_string(),
    items: Vec::new(),
    total,
    payment_method: PaymentMethod::Cod,
    payment_status: PaymentStatus::Pending,
    order_status: OrderStatus::Pending,
  }
}

async fn place(backend: &dyn Backend, number: &str, name: &str, phone: &str, total: i64) -> Order {
  backend.insert_order(&new_order(number, name, phone, total)).await.unwrap()
}

fn cancel() -> OrderStatusUpdate {
  OrderStatusUpdate {
    order_status: Some(OrderStatus::Cancelled),
    payment_status: None,
  }
}

#[tokio::test]
async fn order_view_filters_by_tab_and_search() {
  let app = test_app();
  let backend = app.state.backend.as_ref();
  place(backend, "ORD-000001", "Asha Rao", "9000000001", 1000).await;
  let meera = place(backend, "ORD-000002", "Meera Nair", "9000000002", 2000).await;
  place(backend, "ORD-000003", "Asha Menon", "9000000003", 1500).await;

  app.state.orders.refresh().await.unwrap();
  app.state.orders.update_status(meera.id, &cancel()).await.unwrap();

  let all = app.state.orders.view(StatusTab::All, "");
  assert_eq!(all.orders.len(), 3);
  assert_eq!((all.counts.all, all.counts.pending, all.counts.cancelled), (3, 2, 1));

  let cancelled = app.state.orders.view(StatusTab::Cancelled, "");
  assert_eq!(cancelled.orders[0].customer_name, "Meera Nair");

  let asha = app.state.orders.view(StatusTab::Pending, "ASHA");
  assert_eq!(asha.orders.len(), 2);
  let by_phone = app.state.orders.view(StatusTab::All, "0003");
  assert_eq!(by_phone.orders[0].order_number, "ORD-000003");
  let by_number = app.state.orders.view(StatusTab::All, "ord-000002");
  assert_eq!(by_number.orders.len(), 1);
}

#[tokio::test]
async fn status_updates_and_deletes_report_unknown_orders() {
  let app = test_app();
  let missing = uuid::Uuid::new_v4();
  assert!(matches!(
    app.state.orders.update_status(missing, &cancel()).await,
    Err(AppError::NotFound(_))
  ));
  assert!(matches!(
    app.state.orders.update_status(missing, &OrderStatusUpdate::default()).await,
    Err(AppError::Validation(_))
  ));
  assert!(matches!(app.state.orders.delete(missing).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn watcher_refetches_on_every_change() {
  let app = test_app();
  let watcher = app.state.orders.spawn_watcher(&app.state.feed);
  tokio::task::yield_now().await;

  let order = place(app.state.backend.as_ref(), "ORD-000010", "Ritu", "9000000010", 900).await;
  let mut waited = 0;
  while app.state.orders.snapshot().is_empty() && waited < 50 {
    tokio::time::sleep(Duration::from_millis(10)).await;
    waited += 1;
  }
  assert_eq!(app.state.orders.snapshot().len(), 1);
  let fetches = app.state.orders.fetch_count();

  app.state.backend.delete_order(order.id).await.unwrap();
  waited = 0;
  while !app.state.orders.snapshot().is_empty() && waited < 50 {
    tokio::time::sleep(Duration::from_millis(10)).await;
    waited += 1;
  }
  assert!(app.state.orders.snapshot().is_empty());
  assert!(app.state.orders.fetch_count() > fetches);
  watcher.abort();
}

#[tokio::test]
async fn saving_a_draft_generates_slug_and_keeps_images_when_none_given() {
  let app = test_app();
  let board = &app.state.products;

  let mut draft = ProductDraft::blank(today());
  draft.name = "Rose Gold Kurti Set!".to_string();
  draft.price = Some(2200);
  draft.images = vec!["one.jpg".to_string(), "two.jpg".to_string()];
  let saved = board.save(draft, today()).await.unwrap();
  assert_eq!(saved.slug, "rose-gold-kurti-set");
  assert_eq!(saved.sizes, vec!["S", "M", "L", "XL"]);
  assert_eq!(saved.stock, 10);
  assert_eq!(saved.images.len(), 2);

  let mut edit = ProductDraft::blank(today());
  edit.id = Some(saved.id);
  edit.name = "Rose Gold Kurti Set".to_string();
  edit.slug = Some(saved.slug.clone());
  edit.price = Some(1999);
  let updated = board.save(edit, today()).await.unwrap();
  assert_eq!(updated.id, saved.id);
  assert_eq!(updated.price, 1999);
  let urls: Vec<&str> = updated.images.iter().map(|i| i.image_url.as_str()).collect();
  assert_eq!(urls, vec!["one.jpg", "two.jpg"]);

  let mut reimage = ProductDraft::blank(today());
  reimage.id = Some(saved.id);
  reimage.name = "Rose Gold Kurti Set".to_string();
  reimage.price = Some(1999);
  reimage.images = vec!["three.jpg".to_string()];
  let reimaged = board.save(reimage, today()).await.unwrap();
  assert_eq!(reimaged.images.len(), 1);
  assert_eq!(reimaged.images[0].order_index, 0);

  let rows = board.search("kurti");
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].category_name, UNCATEGORIZED);
}

#[tokio::test]
async fn drafts_need_a_name_and_price() {
  let app = test_app();
  let mut draft = ProductDraft::blank(today());
  draft.price = Some(100);
  assert!(matches!(app.state.products.save(draft, today()).await, Err(AppError::Validation(_))));

  let mut draft = ProductDraft::blank(today());
  draft.name = "No Price".to_string();
  assert!(matches!(app.state.products.save(draft, today()).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn deleting_a_product_refreshes_the_board() {
  let app = test_app();
  let saved = insert_product(app.state.backend.as_ref(), product("Old Tunic", 700, None)).await;
  app.state.products.refresh().await.unwrap();
  assert_eq!(app.state.products.search("").len(), 1);

  app.state.products.delete(saved.id).await.unwrap();
  assert!(app.state.products.search("").is_empty());
  assert!(matches!(app.state.products.delete(saved.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn category_reset_inserts_the_standard_set() {
  let app = test_app();
  let backend = app.state.backend.as_ref();
  insert_category(backend, "Tops", "tops").await;
  insert_category(backend, "Capes", "capes").await;

  let reset = app.state.products.reset_categories().await.unwrap();
  assert_eq!(reset.deleted, 1);
  assert_eq!(reset.inserted, STANDARD_CATEGORIES.len() - 1);
  assert_eq!(reset.warning, None);

  let mut slugs: Vec<String> = backend.list_categories().await.unwrap().into_iter().map(|c| c.slug).collect();
  slugs.sort();
  let mut expected: Vec<String> = STANDARD_CATEGORIES.iter().map(|(_, s)| s.to_string()).collect();
  expected.sort();
  assert_eq!(slugs, expected);
}

#[tokio::test]
async fn category_reset_warns_when_products_are_linked() {
  let app = test_app();
  let backend = app.state.backend.as_ref();
  let capes = insert_category(backend, "Capes", "capes").await;
  let mut cape = product("Velvet Cape", 2600, None);
  cape.category_id = Some(capes.id);
  insert_product(backend, cape).await;

  let reset = app.state.products.reset_categories().await.unwrap();
  assert_eq!(reset.deleted, 0);
  assert_eq!(reset.inserted, STANDARD_CATEGORIES.len());
  assert_eq!(reset.warning.as_deref(), Some(LINKED_CATEGORY_WARNING));
  assert_eq!(backend.list_categories().await.unwrap().len(), STANDARD_CATEGORIES.len() + 1);
}

#[tokio::test]
async fn dashboard_counts_and_survives_a_failed_fetch() {
  let app = test_app();
  let backend = app.state.backend.as_ref();
  place(backend, "ORD-000101", "Asha", "9000000001", 1000).await;
  place(backend, "ORD-000102", "Asha", "9000000001", 500).await;
  let cancelled = place(backend, "ORD-000103", "Meera", "9000000002", 4000).await;
  backend.update_order_status(cancelled.id, &cancel()).await.unwrap();
  insert_product(backend, product("Live Top", 900, None)).await;
  let mut upcoming = product("Soon Dress", 1900, None);
  upcoming.launch_date = days_from_today(3);
  insert_product(backend, upcoming).await;

  let expected = DashboardStats {
    total_sales: 1500,
    total_orders: 3,
    active_products: 1,
    customers: 2,
  };
  assert_eq!(app.state.dashboard.refresh(today()).await, expected);

  app.backend.set_outage(Some("backend offline"));
  assert_eq!(app.state.dashboard.refresh(today()).await, expected);
  app.backend.set_outage(None);
}
