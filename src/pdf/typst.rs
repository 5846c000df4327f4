use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{DashError, Result};
use crate::invoice::InvoiceDocument;

/// Embedded Typst template for invoice rendering.
/// Every element carries its own page position; the template only places them.
const INVOICE_TEMPLATE: &str = r##"// Sales invoice
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set document(title: data.title)
#set page(
  width: data.page_width * 1mm,
  height: data.page_height * 1mm,
  margin: 0pt,
)

#set text(font: ("Roboto", "Arial", "Libertinus Serif"), size: 10pt, lang: "vi")

#let h-align(name) = if name == "right" { right } else if name == "center" { center } else { left }

#let put-text(el) = {
  let body = text(
    size: el.size * 1pt,
    weight: if el.bold { "bold" } else { "regular" },
    style: if el.italic { "italic" } else { "normal" },
    el.content,
  )
  if el.align == "right" {
    place(top + left, dx: (el.x - 150) * 1mm, dy: el.y * 1mm, box(width: 150mm, align(right, body)))
  } else if el.align == "center" {
    place(top + left, dx: (el.x - 100) * 1mm, dy: el.y * 1mm, box(width: 200mm, align(center, body)))
  } else {
    place(top + left, dx: el.x * 1mm, dy: el.y * 1mm, body)
  }
}

#let table-left = data.columns.first().x
#let table-width = data.columns.map(c => c.width).sum()

#let put-row(el) = {
  if el.header {
    place(
      top + left,
      dx: table-left * 1mm,
      dy: el.y * 1mm,
      rect(width: table-width * 1mm, height: data.row_height * 1mm, fill: luma(235), stroke: none),
    )
  }
  for (col, cell) in data.columns.zip(el.cells) {
    let body = text(size: 9pt, weight: if el.header { "bold" } else { "regular" }, cell)
    place(
      top + left,
      dx: col.x * 1mm,
      dy: el.y * 1mm,
      box(
        width: col.width * 1mm,
        height: data.row_height * 1mm,
        inset: (x: 1.5mm),
        align(h-align(col.align) + horizon, body),
      ),
    )
  }
  place(
    top + left,
    dx: table-left * 1mm,
    dy: (el.y + data.row_height) * 1mm,
    line(length: table-width * 1mm, stroke: 0.3pt + gray),
  )
}

#for (i, pg) in data.pages.enumerate() {
  if i > 0 { pagebreak() }
  for el in pg.elements {
    if el.kind == "text" {
      put-text(el)
    } else if el.kind == "row" {
      put-row(el)
    } else if el.kind == "rule" {
      place(top + left, dx: table-left * 1mm, dy: el.y * 1mm, line(length: table-width * 1mm, stroke: 0.5pt + gray))
    }
  }
}
"##;

/// Typst source that reads the invoice data from `json_name`
/// (resolved relative to the source file).
pub fn render_typst(json_name: &str) -> String {
    INVOICE_TEMPLATE.replace("DATA_JSON_PATH", json_name)
}

/// Write the Typst source and its JSON data side by side. Returns the .typ path.
pub fn write_typst_source(document: &InvoiceDocument, typ_path: &Path) -> Result<PathBuf> {
    let json_path = typ_path.with_extension("json");
    let json_name = json_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DashError::PdfGeneration(format!("Invalid path: {}", typ_path.display())))?;

    let json_data = serde_json::to_string(document)
        .map_err(|e| DashError::PdfGeneration(e.to_string()))?;

    if let Some(parent) = typ_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&json_path, json_data)?;
    std::fs::write(typ_path, render_typst(json_name))?;

    Ok(typ_path.to_path_buf())
}

/// Compile `document` to a PDF at `output_path` using the Typst CLI
pub fn save(document: &InvoiceDocument, output_path: &Path) -> Result<()> {
    // Check if typst is available
    if Command::new("typst").arg("--version").output().is_err() {
        return Err(DashError::TypstNotFound);
    }

    let temp_dir = std::env::temp_dir().join("waterdesk");
    std::fs::create_dir_all(&temp_dir)?;

    let stem = format!("invoice-{}", std::process::id());
    let template_path = write_typst_source(document, &temp_dir.join(format!("{stem}.typ")))?;
    let json_path = template_path.with_extension("json");

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(&temp_dir)
        .arg(&template_path)
        .arg(output_path)
        .output()?;

    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DashError::PdfGeneration(stderr.to_string()));
    }

    tracing::info!(order = %document.order_id, path = %output_path.display(), "invoice saved");
    Ok(())
}
