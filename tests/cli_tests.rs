use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Nothing listens on the discard port, so every request fails fast
const DEAD_API: &str = "http://127.0.0.1:9/api";

fn waterdesk_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("waterdesk"));
    cmd.env_remove("WATERDESK_API_URL")
        .env_remove("WATERDESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn write_session(config_path: &Path, role: &str) {
    fs::create_dir_all(config_path).unwrap();
    let session = format!(
        r#"token = "test-token"

[user]
id = "7"
name = "Trần Thị Bình"
username = "binh"
role = "{role}"
"#
    );
    fs::write(config_path.join("session.toml"), session).unwrap();
}

#[test]
fn test_help() {
    waterdesk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Admin console for a bottled-water distribution business",
        ));
}

#[test]
fn test_version() {
    waterdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("waterdesk"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("waterdesk-config");

    waterdesk_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized waterdesk config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("invoices").is_dir());

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("[api]"));
    assert!(content.contains("[company]"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("waterdesk-config");

    waterdesk_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    waterdesk_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_whoami_requires_login() {
    let temp_dir = TempDir::new().unwrap();

    waterdesk_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_whoami_reads_saved_session() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "sales");

    waterdesk_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "--api-url", DEAD_API, "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trần Thị Bình (@binh)"))
        .stdout(predicate::str::contains("Role: sales"))
        .stdout(predicate::str::contains(DEAD_API));
}

#[test]
fn test_protected_command_requires_login() {
    let temp_dir = TempDir::new().unwrap();

    waterdesk_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "--api-url", DEAD_API, "orders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_role_gate_blocks_other_roles() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "customer");
    let dir = temp_dir.path().to_str().unwrap();

    for command in ["users", "dashboard", "revenue", "inventory"] {
        waterdesk_cmd()
            .args(["-C", dir, "--api-url", DEAD_API, command])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Access denied: role 'customer'"));
    }

    write_session(temp_dir.path(), "sales");
    waterdesk_cmd()
        .args(["-C", dir, "--api-url", DEAD_API, "users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied: role 'sales'"));
}

#[test]
fn test_unreachable_api_renders_empty_inventory() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");

    waterdesk_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "--api-url", DEAD_API, "inventory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No inventory data."))
        .stdout(predicate::str::contains("Products: 0"))
        .stdout(predicate::str::contains("Total stock: 0"));
}

#[test]
fn test_unreachable_api_renders_empty_order_list() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "customer");

    waterdesk_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "--api-url",
            DEAD_API,
            "orders",
            "--today",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No orders found."));
}

#[test]
fn test_single_order_surfaces_network_error() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");

    waterdesk_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "--api-url", DEAD_API, "order", "1024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Request to http://127.0.0.1:9/api/orders/1024 failed"));
}

#[test]
fn test_login_against_unreachable_api_fails_without_session() {
    let temp_dir = TempDir::new().unwrap();

    waterdesk_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "--api-url",
            DEAD_API,
            "login",
            "binh",
            "-p",
            "secret",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Request to"));

    assert!(!temp_dir.path().join("session.toml").exists());
}

#[test]
fn test_set_status_rejects_unknown_status() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");

    waterdesk_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "--api-url",
            DEAD_API,
            "set-status",
            "1024",
            "shipped",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid order status 'shipped'"));
}

#[test]
fn test_pay_rejects_non_positive_amount() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");

    waterdesk_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "--api-url", DEAD_API, "pay", "1024", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be greater than zero"));
}

#[test]
fn test_pay_rejects_non_finite_amount() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");

    for amount in ["NaN", "inf"] {
        waterdesk_cmd()
            .args([
                "-C",
                temp_dir.path().to_str().unwrap(),
                "--api-url",
                DEAD_API,
                "pay",
                "1024",
                amount,
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Amount must be greater than zero"));
    }
}

#[test]
fn test_revenue_rejects_bad_month() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");

    waterdesk_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "--api-url",
            DEAD_API,
            "revenue",
            "--month",
            "13",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("13"));
}

#[test]
fn test_logout_removes_session() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path(), "admin");
    let dir = temp_dir.path().to_str().unwrap();

    waterdesk_cmd()
        .args(["-C", dir, "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    assert!(!temp_dir.path().join("session.toml").exists());

    waterdesk_cmd()
        .args(["-C", dir, "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}
