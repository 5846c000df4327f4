mod typst;

pub use typst::{render_typst, save, write_typst_source};

use chrono::Local;
use std::path::{Path, PathBuf};

use crate::error::{DashError, Result};
use crate::invoice::InvoiceDocument;

/// Save the invoice into `spool_dir` under its generated name and hand it to
/// the system viewer for printing. Returns the saved path.
pub fn print(document: &InvoiceDocument, spool_dir: &Path) -> Result<PathBuf> {
    let path = spool_dir.join(document.file_name(Local::now()));
    save(document, &path)?;
    open_path(&path)?;
    Ok(path)
}

/// Open a file with the system default viewer
pub fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .map_err(DashError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .map_err(DashError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .arg("/C")
            .arg("start")
            .arg("")
            .arg(path)
            .spawn()
            .map_err(DashError::Io)?;
    }

    Ok(())
}
