//! Session context and role gate.
//!
//! The shell owns one [`Session`] and hands it to whatever needs it; storage
//! is only touched through [`SessionStore`] at explicit load/save points.

use std::fmt;

use crate::api::{ApiClient, LoginResponse, Role, User};
use crate::config::{SessionStore, StoredSession};
use crate::error::{DashError, Result};

/// Something that can exchange credentials for a token
pub trait Authenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse>;
}

impl Authenticator for ApiClient {
    fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.login(username, password)
    }
}

/// Views a user can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Orders,
    Customers,
    Users,
    Transactions,
    Inventory,
    Revenue,
    Invoice,
}

impl Route {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Route::Login => &[Role::Admin, Role::Sales, Role::Customer],
            Route::Dashboard => &[Role::Admin, Role::Sales],
            Route::Orders => &[Role::Admin, Role::Sales, Role::Customer],
            Route::Customers => &[Role::Admin, Role::Sales],
            Route::Users => &[Role::Admin],
            Route::Transactions => &[Role::Admin],
            Route::Inventory => &[Role::Admin, Role::Sales],
            Route::Revenue => &[Role::Admin],
            Route::Invoice => &[Role::Admin, Role::Sales],
        }
    }

    /// Where a role lands after logging in
    pub fn home_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::Dashboard,
            Role::Sales => Route::Orders,
            Role::Customer => Route::Orders,
        }
    }

    /// The command that opens this view
    pub fn command(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Orders => "orders",
            Route::Customers => "customers",
            Route::Users => "users",
            Route::Transactions => "transactions",
            Route::Inventory => "inventory",
            Route::Revenue => "revenue",
            Route::Invoice => "invoice",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
    token: Option<String>,
}

impl Session {
    /// Rebuild the session from storage. A missing file is a logged-out session.
    pub fn load(store: &SessionStore) -> Result<Self> {
        Ok(match store.load()? {
            Some(stored) => Self {
                user: Some(stored.user),
                token: Some(stored.token),
            },
            None => Self::default(),
        })
    }

    pub fn signed_in(user: User, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn check_role(&self, allowed: &[Role]) -> bool {
        match &self.user {
            Some(user) => allowed.contains(&user.role),
            None => false,
        }
    }

    /// Authenticate, persist the identity, and return the route to redirect to.
    /// A rejected login surfaces the API's message untouched.
    pub fn login(
        &mut self,
        authenticator: &impl Authenticator,
        store: &SessionStore,
        username: &str,
        password: &str,
    ) -> Result<Route> {
        let response = authenticator.authenticate(username, password)?;
        let stored = StoredSession {
            token: response.token,
            user: response.user,
        };
        store.save(&stored)?;

        tracing::info!(username = %stored.user.username, role = %stored.user.role, "logged in");

        let home = Route::home_for(stored.user.role);
        self.token = Some(stored.token);
        self.user = Some(stored.user);
        Ok(home)
    }

    pub fn logout(&mut self, store: &SessionStore) -> Result<Route> {
        self.user = None;
        self.token = None;
        store.clear()?;
        Ok(Route::Login)
    }

    /// Check that this session may open `route`
    pub fn guard(&self, route: Route) -> Result<&User> {
        let user = self.user.as_ref().ok_or(DashError::NotAuthenticated)?;
        if route.allowed_roles().contains(&user.role) {
            Ok(user)
        } else {
            tracing::warn!(role = %user.role, %route, "navigation refused");
            Err(DashError::Forbidden {
                role: user.role.to_string(),
                route: route.to_string(),
            })
        }
    }
}
