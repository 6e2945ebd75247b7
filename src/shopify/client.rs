//! Shopify Admin REST API client.
//!
//! Every request is bounded by the configured timeout. List endpoints are
//! cursor paginated: the cursor for the next and previous page arrives in
//! the `Link` response header and is sent back as `page_info`.

use std::time::Duration;

use reqwest::{Client, Response, Url, header::LINK};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::error::ShopifyError;
use super::types::{ShopifyCustomer, ShopifyOrder};
use crate::config::ShopifyConfig;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// One page of a list endpoint plus the cursors around it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_info: Option<String>,
    pub previous_page_info: Option<String>,
}

/// Filters accepted by the orders list endpoint.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// `open`, `closed`, `cancelled` or `any`. Shopify defaults to `open`.
    pub status: Option<String>,
    pub customer_id: Option<i64>,
}

impl OrderFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = &self.status {
            params.push(("status", status.clone()));
        }
        if let Some(customer_id) = self.customer_id {
            params.push(("customer_id", customer_id.to_string()));
        }
        params
    }
}

#[derive(Clone)]
pub struct ShopifyClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
    timeout: Duration,
    page_delay: Duration,
    page_limit: u32,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("page_delay", &self.page_delay)
            .finish_non_exhaustive()
    }
}

impl ShopifyClient {
    /// Build a client from configuration.
    ///
    /// A bare shop domain gets `https://`; a full URL (used against local
    /// mocks) is taken as is.
    ///
    /// # Errors
    ///
    /// Returns error if the shop URL or token is empty or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let shop = config.shop_url.trim().trim_end_matches('/');
        if shop.is_empty() {
            return Err(ShopifyError::Config("shop URL is empty".into()));
        }
        if config.access_token.expose_secret().trim().is_empty() {
            return Err(ShopifyError::Config("access token is empty".into()));
        }

        let origin = if shop.starts_with("http://") || shop.starts_with("https://") {
            shop.to_string()
        } else {
            format!("https://{shop}")
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("order-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShopifyError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{origin}/admin/api/{}", config.api_version),
            access_token: config.access_token.clone(),
            timeout: config.timeout,
            page_delay: config.page_delay,
            page_limit: config.page_limit,
        })
    }

    pub async fn customers_page(
        &self,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyCustomer>, ShopifyError> {
        self.get_page("customers.json", "customers", &[], page_info)
            .await
    }

    /// Every customer in the shop, following cursors until exhausted.
    pub async fn all_customers(&self) -> Vec<ShopifyCustomer> {
        self.fetch_all("customers.json", "customers", Vec::new())
            .await
    }

    pub async fn search_customers(&self, query: &str) -> Result<Vec<ShopifyCustomer>, ShopifyError> {
        let page = self
            .get_page(
                "customers/search.json",
                "customers",
                &[("query", query.to_string())],
                None,
            )
            .await?;
        Ok(page.items)
    }

    pub async fn customer(&self, id: i64) -> Result<ShopifyCustomer, ShopifyError> {
        self.get_one(&format!("customers/{id}.json"), "customer")
            .await
    }

    pub async fn orders_page(
        &self,
        filter: &OrderFilter,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyOrder>, ShopifyError> {
        self.get_page("orders.json", "orders", &filter.params(), page_info)
            .await
    }

    pub async fn all_orders(&self, filter: &OrderFilter) -> Vec<ShopifyOrder> {
        self.fetch_all("orders.json", "orders", filter.params())
            .await
    }

    /// Every order placed by one customer, any status.
    pub async fn customer_orders(&self, customer_id: i64) -> Vec<ShopifyOrder> {
        self.fetch_all(
            &format!("customers/{customer_id}/orders.json"),
            "orders",
            vec![("status", "any".to_string())],
        )
        .await
    }

    pub async fn order(&self, id: i64) -> Result<ShopifyOrder, ShopifyError> {
        self.get_one(&format!("orders/{id}.json"), "order").await
    }

    /// Follow `rel="next"` until the last page.
    ///
    /// A failing page ends the walk: the error is logged and the items
    /// gathered so far are returned.
    #[instrument(skip(self, params), fields(path = %path))]
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        params: Vec<(&'static str, String)>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            if pages > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let page = match self.get_page::<T>(path, key, &params, cursor.as_deref()).await {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        error = %err,
                        pages,
                        collected = items.len(),
                        "pagination stopped early, returning partial results"
                    );
                    break;
                }
            };

            pages += 1;
            items.extend(page.items);
            match page.next_page_info {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(pages, collected = items.len(), "pagination finished");
        items
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        params: &[(&'static str, String)],
        page_info: Option<&str>,
    ) -> Result<Page<T>, ShopifyError> {
        // Shopify rejects filters alongside a cursor; the cursor encodes them.
        let mut query = vec![("limit", self.page_limit.to_string())];
        match page_info {
            Some(cursor) => query.push(("page_info", cursor.to_string())),
            None => query.extend(params.iter().cloned()),
        }

        let response = self.send(path, &query).await?;
        let (next_page_info, previous_page_info) = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let items = self.decode_field(response, key).await?;
        Ok(Page {
            items,
            next_page_info,
            previous_page_info,
        })
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ShopifyError> {
        let response = self.send(path, &[]).await?;
        self.decode_field(response, key).await
    }

    #[instrument(skip(self, query), fields(path = %path))]
    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<Response, ShopifyError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .header(ACCESS_TOKEN_HEADER, self.access_token.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Shopify request rejected");
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Read the body and take the object under `key`. The client timeout
    /// covers the body too, so a stalled body is a timeout like any other.
    async fn decode_field<T: DeserializeOwned>(
        &self,
        response: Response,
        key: &str,
    ) -> Result<T, ShopifyError> {
        let mut body: Map<String, Value> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ShopifyError::Timeout(self.timeout)
            } else {
                ShopifyError::Decode(e.to_string())
            }
        })?;
        let value = body
            .remove(key)
            .ok_or_else(|| ShopifyError::Decode(format!("missing `{key}` in response")))?;
        serde_json::from_value(value).map_err(|e| ShopifyError::Decode(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> ShopifyError {
        if err.is_timeout() {
            ShopifyError::Timeout(self.timeout)
        } else {
            ShopifyError::Request(err.to_string())
        }
    }
}

/// Extract the `page_info` cursors for `rel="next"` and `rel="previous"`.
pub fn parse_link_header(header: &str) -> (Option<String>, Option<String>) {
    let mut next = None;
    let mut previous = None;

    for link in header.split(',') {
        let mut parts = link.split(';');
        let Some(target) = parts.next() else {
            continue;
        };
        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        let rel = parts
            .filter_map(|p| p.trim().strip_prefix("rel="))
            .map(|r| r.trim_matches('"'))
            .next();

        let cursor = Url::parse(target).ok().and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "page_info")
                .map(|(_, v)| v.into_owned())
        });

        match rel {
            Some("next") => next = cursor,
            Some("previous") => previous = cursor,
            _ => {}
        }
    }

    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_next_and_previous_cursors() {
        let header = r#"<https://shop.example.com/admin/api/2024-01/orders.json?limit=50&page_info=prevCursor>; rel="previous", <https://shop.example.com/admin/api/2024-01/orders.json?limit=50&page_info=nextCursor>; rel="next""#;
        let (next, previous) = parse_link_header(header);
        assert_eq!(next.as_deref(), Some("nextCursor"));
        assert_eq!(previous.as_deref(), Some("prevCursor"));
    }

    #[test]
    fn last_page_has_no_next_cursor() {
        let header =
            r#"<https://shop.example.com/admin/api/2024-01/orders.json?page_info=abc>; rel="previous""#;
        let (next, previous) = parse_link_header(header);
        assert!(next.is_none());
        assert_eq!(previous.as_deref(), Some("abc"));
    }

    #[test]
    fn builds_https_base_url_from_bare_domain() {
        let config = ShopifyConfig::new("demo.myshopify.com/", "token");
        let client = ShopifyClient::new(&config).expect("client");
        assert_eq!(client.base_url, "https://demo.myshopify.com/admin/api/2024-01");
    }

    #[test]
    fn rejects_empty_token() {
        let config = ShopifyConfig::new("demo.myshopify.com", "  ");
        assert!(matches!(
            ShopifyClient::new(&config),
            Err(ShopifyError::Config(_))
        ));
    }
}
