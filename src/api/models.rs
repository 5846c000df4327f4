use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::de;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "ADMIN", alias = "Admin")]
    Admin,
    #[serde(alias = "SALES", alias = "Sales")]
    Sales,
    #[serde(alias = "CUSTOMER", alias = "Customer")]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id", deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum OrderStatus {
    Completed,
    #[default]
    Pending,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "completed",
            OrderStatus::Pending => "pending",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Vietnamese label used on screen
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "Hoàn thành",
            OrderStatus::Pending => "Chờ xử lý",
            OrderStatus::Canceled => "Đã hủy",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" | "complete" | "done" => Some(OrderStatus::Completed),
            "pending" => Some(OrderStatus::Pending),
            "canceled" | "cancelled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }
}

impl From<Option<String>> for OrderStatus {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().and_then(OrderStatus::parse).unwrap_or_default()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, alias = "_id", deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::id")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub customer_name: String,
    #[serde(default, alias = "createdAt", deserialize_with = "de::opt_timestamp")]
    pub order_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "de::number")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub paid_amount: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub debt_remaining: f64,
    /// Containers issued with this order
    #[serde(default, deserialize_with = "de::count")]
    pub returnable_out: i64,
    /// Containers brought back
    #[serde(default, deserialize_with = "de::count")]
    pub returnable_in: i64,
    #[serde(default, deserialize_with = "de::number")]
    pub deposit_amount: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub deposit_paid: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub deposit_debt: f64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub note: Option<String>,
}

impl Order {
    pub fn returnable_outstanding(&self) -> i64 {
        self.returnable_out - self.returnable_in
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, alias = "_id", deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::id")]
    pub order_id: String,
    #[serde(default, deserialize_with = "de::id")]
    pub product_id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub product_name: String,
    #[serde(default, deserialize_with = "de::number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub unit_price: f64,
    #[serde(default, alias = "subtotal", alias = "lineTotal", deserialize_with = "de::number")]
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum CustomerType {
    #[default]
    Retail,
    /// Second-tier reseller (đại lý cấp 2)
    Agency,
}

impl From<Option<String>> for CustomerType {
    fn from(raw: Option<String>) -> Self {
        let raw = raw.unwrap_or_default().to_lowercase();
        if raw.contains("agen") || raw.contains("đại lý") || raw.contains("dai_ly") {
            CustomerType::Agency
        } else {
            CustomerType::Retail
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerType::Retail => f.write_str("Khách lẻ"),
            CustomerType::Agency => f.write_str("Đại lý cấp 2"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, alias = "_id", deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub email: Option<String>,
    #[serde(default, alias = "type")]
    pub customer_type: CustomerType,
    #[serde(default, deserialize_with = "de::number")]
    pub debt: f64,
    #[serde(default, deserialize_with = "de::count")]
    pub returnable_debt: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, alias = "_id", deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::id")]
    pub order_id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "de::number")]
    pub amount: f64,
    #[serde(default, rename = "type", deserialize_with = "de::string")]
    pub kind: String,
    #[serde(default, alias = "createdAt", deserialize_with = "de::opt_timestamp")]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    #[serde(default, alias = "id", deserialize_with = "de::id")]
    pub product_id: String,
    #[serde(default, alias = "name", deserialize_with = "de::string")]
    pub product_name: String,
    #[serde(default, alias = "quantity", deserialize_with = "de::count")]
    pub stock: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    #[serde(default)]
    pub low_stock: Vec<InventoryEntry>,
    #[serde(default)]
    pub out_of_stock: Vec<InventoryEntry>,
    #[serde(default)]
    pub most_stocked: Vec<InventoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueEntry {
    #[serde(deserialize_with = "de::date")]
    pub date: NaiveDate,
    #[serde(
        default,
        alias = "totalRevenue",
        alias = "revenue",
        deserialize_with = "de::number"
    )]
    pub total: f64,
}

impl RevenueEntry {
    pub fn new(date: NaiveDate, total: f64) -> Self {
        Self { date, total }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MonthlyRevenueEntry {
    #[serde(default, deserialize_with = "de::count")]
    pub year: i64,
    #[serde(default, deserialize_with = "de::count")]
    pub month: i64,
    #[serde(
        default,
        alias = "totalRevenue",
        alias = "revenue",
        deserialize_with = "de::number"
    )]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "de::count")]
    pub total_orders: i64,
    #[serde(default, deserialize_with = "de::number")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "de::count")]
    pub total_customers: i64,
    #[serde(default, deserialize_with = "de::number")]
    pub total_debt: f64,
    #[serde(default, deserialize_with = "de::count")]
    pub pending_orders: i64,
}
