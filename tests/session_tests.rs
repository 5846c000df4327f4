use std::cell::Cell;

use tempfile::TempDir;
use waterdesk::api::{LoginResponse, Role, User};
use waterdesk::auth::{Authenticator, Route, Session};
use waterdesk::config::SessionStore;
use waterdesk::error::{DashError, Result};

fn user(role: Role) -> User {
    User {
        id: "42".to_string(),
        name: "Nguyễn Văn An".to_string(),
        username: "an".to_string(),
        role,
    }
}

/// Accepts one password, counts attempts
struct FakeApi {
    role: Role,
    calls: Cell<usize>,
}

impl FakeApi {
    fn new(role: Role) -> Self {
        Self {
            role,
            calls: Cell::new(0),
        }
    }
}

impl Authenticator for FakeApi {
    fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.calls.set(self.calls.get() + 1);
        if password == "secret" {
            Ok(LoginResponse {
                token: format!("token-for-{username}"),
                user: user(self.role),
            })
        } else {
            Err(DashError::Api("Sai tên đăng nhập hoặc mật khẩu".to_string()))
        }
    }
}

const ALL: [Role; 3] = [Role::Admin, Role::Sales, Role::Customer];

#[test]
fn test_check_role_membership() {
    for role in ALL {
        let session = Session::signed_in(user(role), "t");
        assert!(session.check_role(&ALL));
        assert!(session.check_role(&[role]));
        let others: Vec<Role> = ALL.iter().copied().filter(|r| *r != role).collect();
        assert!(!session.check_role(&others));
        assert!(!session.check_role(&[]));
    }
}

#[test]
fn test_check_role_false_without_user() {
    let session = Session::default();
    assert!(!session.is_authenticated());
    assert!(!session.check_role(&ALL));
}

#[test]
fn test_login_persists_and_redirects_by_role() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::new(temp.path());

    let expected = [
        (Role::Admin, Route::Dashboard),
        (Role::Sales, Route::Orders),
        (Role::Customer, Route::Orders),
    ];
    for (role, home) in expected {
        let mut session = Session::default();
        let route = session.login(&FakeApi::new(role), &store, "an", "secret").unwrap();
        assert_eq!(route, home);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("token-for-an"));

        let reloaded = Session::load(&store).unwrap();
        assert_eq!(reloaded.user(), Some(&user(role)));
        assert_eq!(reloaded.token(), Some("token-for-an"));
    }
}

#[test]
fn test_failed_login_surfaces_message_without_retry() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::new(temp.path());
    let api = FakeApi::new(Role::Admin);
    let mut session = Session::default();

    let err = session.login(&api, &store, "an", "wrong").unwrap_err();
    assert_eq!(err.to_string(), "Sai tên đăng nhập hoặc mật khẩu");
    assert_eq!(api.calls.get(), 1);
    assert!(!session.is_authenticated());
    assert!(!store.path().exists());
}

#[test]
fn test_logout_clears_memory_and_storage() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::new(temp.path());
    let mut session = Session::default();
    session
        .login(&FakeApi::new(Role::Sales), &store, "an", "secret")
        .unwrap();
    assert!(store.path().exists());

    assert_eq!(session.logout(&store).unwrap(), Route::Login);
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(!store.path().exists());
    assert!(!Session::load(&store).unwrap().is_authenticated());

    // Logging out twice is harmless
    assert_eq!(session.logout(&store).unwrap(), Route::Login);
}

#[test]
fn test_guard_by_route() {
    let anonymous = Session::default();
    assert!(matches!(
        anonymous.guard(Route::Orders),
        Err(DashError::NotAuthenticated)
    ));

    let admin = Session::signed_in(user(Role::Admin), "t");
    for route in [
        Route::Dashboard,
        Route::Orders,
        Route::Customers,
        Route::Users,
        Route::Transactions,
        Route::Inventory,
        Route::Revenue,
        Route::Invoice,
    ] {
        assert!(admin.guard(route).is_ok(), "admin should open {route}");
    }

    let sales = Session::signed_in(user(Role::Sales), "t");
    assert!(sales.guard(Route::Invoice).is_ok());
    assert!(matches!(sales.guard(Route::Users), Err(DashError::Forbidden { .. })));
    assert!(matches!(sales.guard(Route::Revenue), Err(DashError::Forbidden { .. })));

    let customer = Session::signed_in(user(Role::Customer), "t");
    assert!(customer.guard(Route::Orders).is_ok());
    assert!(matches!(customer.guard(Route::Dashboard), Err(DashError::Forbidden { .. })));
}

#[test]
fn test_every_home_route_is_open_to_its_role() {
    for role in ALL {
        let home = Route::home_for(role);
        assert!(home.allowed_roles().contains(&role));
        assert!(Session::signed_in(user(role), "t").guard(home).is_ok());
    }
}
