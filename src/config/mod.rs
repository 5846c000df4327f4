mod company;
mod session;

pub use company::{ApiSettings, Company, Config, PdfSettings};
pub use session::{SessionStore, StoredSession};

use crate::error::{DashError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `[api].base_url`
pub const API_URL_ENV: &str = "WATERDESK_API_URL";

/// Get the config directory path (XDG config dir, or ~/.waterdesk/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "waterdesk") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        DashError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".waterdesk"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the invoice output directory. Relative paths hang off the config dir.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load config.toml. A missing file yields the defaults; the environment
/// override for the API URL is applied either way.
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    let mut config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| DashError::ConfigParse { path, source: e })?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Config::default()
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api.base_url = url;
        }
    }

    Ok(config)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://localhost:5000/api"   # overridden by WATERDESK_API_URL
timeout_secs = 15

# Letterhead printed on invoices. Omitted fields use the built-in defaults.
[company]
name = "NƯỚC UỐNG TINH KHIẾT AN PHÚ"
address = "123 Lê Lợi, Phường Bến Thành, Quận 1, TP. Hồ Chí Minh"
phone = "0909 123 456"
email = "lienhe@anphuwater.vn"
# tax_id = "0312345678"
# addendum = "Vui lòng hoàn trả vỏ bình trong vòng 7 ngày.\nĐổi trả hàng trong 24 giờ."

[pdf]
output_dir = "invoices"   # relative paths live under this config directory
"#;
