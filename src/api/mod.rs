//! Blocking client for the distribution REST API.
//!
//! Every method is a single request/response mapping. Nothing is cached,
//! retried or coalesced; callers decide what a failure means for their view.

mod de;
mod models;

pub use de::parse_timestamp;
pub use models::{
    Customer, CustomerType, DashboardStats, InventoryEntry, InventoryReport, LoginResponse,
    MonthlyRevenueEntry, Order, OrderItem, OrderStatus, RevenueEntry, Role, Transaction, User,
};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use ureq::Agent;

use crate::config::ApiSettings;
use crate::error::{DashError, Result};

pub struct ApiClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every subsequent request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let request = self
            .authorize(self.agent.get(url.as_str()))
            .header("Accept", "application/json");
        let response = request.call().map_err(|e| DashError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        decode(&url, response)
    }

    fn send<T: DeserializeOwned>(&self, method: &str, path: &str, body: &Value) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, method, "sending");

        let request = match method {
            "POST" => self.agent.post(url.as_str()),
            "PUT" => self.agent.put(url.as_str()),
            _ => self.agent.patch(url.as_str()),
        };
        let payload = body.to_string();
        let response = self
            .authorize(request)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(payload.as_bytes())
            .map_err(|e| DashError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        decode(&url, response)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.send(
            "POST",
            "/auth/login",
            &json!({ "username": username, "password": password }),
        )
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get("/dashboard/stats")
    }

    pub fn orders(&self) -> Result<Vec<Order>> {
        self.get("/orders")
    }

    pub fn order(&self, id: &str) -> Result<Order> {
        self.get(&format!("/orders/{id}"))
    }

    pub fn order_items(&self, order_id: &str) -> Result<Vec<OrderItem>> {
        self.get(&format!("/orders/{order_id}/items"))
    }

    pub fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        self.send(
            "PATCH",
            &format!("/orders/{order_id}/status"),
            &json!({ "status": status.as_str() }),
        )
    }

    /// Record a payment against the order's outstanding debt
    pub fn record_payment(&self, order_id: &str, amount: f64) -> Result<Order> {
        self.send(
            "PATCH",
            &format!("/orders/{order_id}/payment"),
            &json!({ "amount": amount }),
        )
    }

    /// Record containers brought back for an order
    pub fn record_returnable(&self, order_id: &str, returned: i64) -> Result<Order> {
        self.send(
            "PATCH",
            &format!("/orders/{order_id}/returnable"),
            &json!({ "returnableIn": returned }),
        )
    }

    pub fn customers(&self) -> Result<Vec<Customer>> {
        self.get("/customers")
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.get("/users")
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.get("/transactions")
    }

    pub fn daily_revenue(&self, month: u32, year: i32) -> Result<Vec<RevenueEntry>> {
        self.get(&format!("/reports/revenue/daily?month={month}&year={year}"))
    }

    pub fn monthly_revenue(&self, year: i32) -> Result<Vec<MonthlyRevenueEntry>> {
        self.get(&format!("/reports/revenue/monthly?year={year}"))
    }

    pub fn inventory_report(&self) -> Result<InventoryReport> {
        self.get("/reports/inventory")
    }
}

fn decode<T: DeserializeOwned>(url: &str, mut response: ureq::http::Response<ureq::Body>) -> Result<T> {
    let status = response.status();
    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| DashError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "request rejected");
        return Err(DashError::Api(error_message(status.as_u16(), &text)));
    }

    parse_body(&text).map_err(|reason| DashError::Decode {
        url: url.to_string(),
        reason,
    })
}

/// Decode a response body, unwrapping a `{ "data": ... }` envelope when present.
pub fn parse_body<T: DeserializeOwned>(text: &str) -> std::result::Result<T, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| e.to_string())
}

/// The API's own message when it sent one, otherwise the status code.
pub fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("error")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with HTTP {status}"))
}
