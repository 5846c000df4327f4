use chrono::{DateTime, Local};
use serde::Serialize;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN_X: f32 = 15.0;
pub const ROW_HEIGHT: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One column of the item table, in millimetres from the page's left edge
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub title: &'static str,
    pub x: f32,
    pub width: f32,
    pub align: Align,
}

pub const COLUMNS: [Column; 5] = [
    Column { title: "STT", x: MARGIN_X, width: 12.0, align: Align::Center },
    Column { title: "Sản phẩm", x: 27.0, width: 80.0, align: Align::Left },
    Column { title: "Số lượng", x: 107.0, width: 20.0, align: Align::Center },
    Column { title: "Đơn giá", x: 127.0, width: 34.0, align: Align::Right },
    Column { title: "Thành tiền", x: 161.0, width: 34.0, align: Align::Right },
];

/// A positioned run of text. `x` is the anchor for `align`: the left edge,
/// the centre, or the right edge.
#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub x: f32,
    pub y: f32,
    pub content: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub y: f32,
    pub header: bool,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Text(TextBlock),
    Row(TableRow),
    Rule { y: f32 },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub elements: Vec<Element>,
}

/// Where the item table stopped: page index and the y offset of its last row's bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableEnd {
    pub page: usize,
    pub y: f32,
}

/// A fully laid-out invoice, ready to save or print
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
    pub order_id: String,
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub row_height: f32,
    pub columns: Vec<Column>,
    pub pages: Vec<Page>,
    pub table_end: TableEnd,
    /// Label/value pairs of the payment and container summary, as printed
    pub summary: Vec<(String, String)>,
}

impl InvoiceDocument {
    /// Item rows across all pages, header rows excluded
    pub fn item_rows(&self) -> Vec<&TableRow> {
        self.rows().filter(|r| !r.header).collect()
    }

    pub fn header_rows(&self) -> Vec<&TableRow> {
        self.rows().filter(|r| r.header).collect()
    }

    fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.pages.iter().flat_map(|p| &p.elements).filter_map(|e| match e {
            Element::Row(row) => Some(row),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.pages.iter().flat_map(|p| &p.elements).filter_map(|e| match e {
            Element::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.content.contains(needle))
    }

    pub fn summary_value(&self, label: &str) -> Option<&str> {
        self.summary
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// `invoice-<order id>-<YYYYMMDDHHMMSS>.pdf`
    pub fn file_name(&self, generated_at: DateTime<Local>) -> String {
        let id: String = self
            .order_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("invoice-{}-{}.pdf", id, generated_at.format("%Y%m%d%H%M%S"))
    }
}
