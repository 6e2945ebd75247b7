mod common;

use std::time::Duration;

use order_sync::shopify::{OrderFilter, ShopifyClient, ShopifyError};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOMERS: &str = "/admin/api/2024-01/customers.json";
const ORDERS: &str = "/admin/api/2024-01/orders.json";

fn link(server: &MockServer, endpoint: &str, next: Option<&str>, previous: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(cursor) = previous {
        parts.push(format!(
            "<{}{endpoint}?limit=250&page_info={cursor}>; rel=\"previous\"",
            server.uri()
        ));
    }
    if let Some(cursor) = next {
        parts.push(format!(
            "<{}{endpoint}?limit=250&page_info={cursor}>; rel=\"next\"",
            server.uri()
        ));
    }
    parts.join(", ")
}

fn customer(id: i64) -> serde_json::Value {
    json!({ "id": id, "first_name": "Customer", "last_name": id.to_string() })
}

#[tokio::test]
async fn single_page_returns_cursors_from_link_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(header("X-Shopify-Access-Token", common::TOKEN))
        .and(query_param("limit", "250"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "customers": [customer(1), customer(2)] }))
                .insert_header("link", link(&server, CUSTOMERS, Some("c2"), None).as_str()),
        )
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let page = client.customers_page(None).await.expect("page");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].full_name(), "Customer 2");
    assert_eq!(page.next_page_info.as_deref(), Some("c2"));
    assert!(page.previous_page_info.is_none());
}

#[tokio::test]
async fn fetch_all_follows_cursors_until_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "customers": [customer(1)] }))
                .insert_header("link", link(&server, CUSTOMERS, Some("c2"), None).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CUSTOMERS))
        .and(query_param("page_info", "c2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "customers": [customer(2)] }))
                .insert_header("link", link(&server, CUSTOMERS, None, Some("c1")).as_str()),
        )
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let customers = client.all_customers().await;

    let ids: Vec<i64> = customers.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

// Page 3 of 5 fails: the first two pages are kept, nothing after is fetched.
#[tokio::test]
async fn failing_page_returns_partial_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "orders": [{ "id": 1, "order_number": 1001 }] }))
                .insert_header("link", link(&server, ORDERS, Some("p2"), None).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ORDERS))
        .and(query_param("page_info", "p2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "orders": [{ "id": 2, "order_number": 1002 }] }))
                .insert_header("link", link(&server, ORDERS, Some("p3"), Some("p1")).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ORDERS))
        .and(query_param("page_info", "p3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ORDERS))
        .and(query_param("page_info", "p4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let orders = client.all_orders(&OrderFilter::default()).await;

    let numbers: Vec<i64> = orders.iter().map(|o| o.order_number).collect();
    assert_eq!(numbers, vec![1001, 1002]);
}

#[tokio::test]
async fn filters_are_not_resent_with_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS))
        .and(query_param("page_info", "next"))
        .and(query_param_is_missing("status"))
        .and(query_param_is_missing("customer_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let filter = OrderFilter {
        status: Some("any".into()),
        customer_id: Some(7001),
    };
    let page = client.orders_page(&filter, Some("next")).await.expect("page");
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn first_page_carries_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS))
        .and(query_param("status", "any"))
        .and(query_param("customer_id", "7001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let filter = OrderFilter {
        status: Some("any".into()),
        customer_id: Some(7001),
    };
    client.orders_page(&filter, None).await.expect("page");
}

#[tokio::test]
async fn slow_shop_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/orders/1.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "order": { "id": 1, "order_number": 1001 } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = common::shopify_config(&server.uri());
    config.timeout = Duration::from_millis(200);
    let client = ShopifyClient::new(&config).expect("client");

    let err = client.order(1).await.expect_err("should time out");
    assert!(matches!(err, ShopifyError::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/customers/9.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let err = client.customer(9).await.expect_err("401");
    assert!(matches!(err, ShopifyError::Status { status: 401, ref body } if body.contains("Invalid")));
}

#[tokio::test]
async fn search_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/customers/search.json"))
        .and(query_param("query", "phone:9876543210"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "customers": [customer(5)] })))
        .mount(&server)
        .await;

    let client = common::shopify_client(&server.uri());
    let found = client.search_customers("phone:9876543210").await.expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 5);
}

// Headers arrive promptly but the body never completes.
#[tokio::test]
async fn stalled_body_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0_u8; 4096];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"order\":",
                )
                .await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });

    let mut config = common::shopify_config(&format!("http://{addr}"));
    config.timeout = Duration::from_millis(300);
    let client = ShopifyClient::new(&config).expect("client");

    let err = client.order(1).await.expect_err("should time out");
    assert!(matches!(err, ShopifyError::Timeout(d) if d == Duration::from_millis(300)));
}
