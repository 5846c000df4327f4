pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;
pub mod report;

pub use api::{ApiClient, Customer, InventoryEntry, Order, OrderItem, OrderStatus, RevenueEntry, Role, User};
pub use auth::{Authenticator, Route, Session};
pub use config::{Company, Config, SessionStore};
pub use error::{DashError, Result};
pub use invoice::{generate, InvoiceDocument};
