use chrono::Local;

use super::document::{
    Align, Element, InvoiceDocument, Page, TableEnd, TableRow, TextBlock, COLUMNS, MARGIN_X,
    PAGE_HEIGHT, PAGE_WIDTH, ROW_HEIGHT,
};
use super::format::{format_datetime, format_grouped, format_quantity, format_vnd};
use crate::api::{Order, OrderItem};
use crate::config::Company;

pub const TITLE: &str = "HÓA ĐƠN BÁN HÀNG";
pub const LABEL_TOTAL: &str = "Tổng tiền";
pub const LABEL_PAID: &str = "Đã thanh toán";
pub const LABEL_DEBT: &str = "Còn nợ";
pub const LABEL_RETURNABLE_OUT: &str = "Vỏ xuất";
pub const LABEL_RETURNABLE_IN: &str = "Vỏ thu về";
pub const LABEL_RETURNABLE_OWED: &str = "Vỏ còn nợ";
pub const FOOTER: &str = "Cảm ơn quý khách đã tin dùng sản phẩm!";

const DEFAULT_NAME: &str = "NƯỚC UỐNG TINH KHIẾT AN PHÚ";
const DEFAULT_ADDRESS: &str = "123 Lê Lợi, Phường Bến Thành, Quận 1, TP. Hồ Chí Minh";
const DEFAULT_PHONE: &str = "0909 123 456";
const DEFAULT_EMAIL: &str = "lienhe@anphuwater.vn";
const DEFAULT_TAX_ID: &str = "0312345678";

const CENTER_X: f32 = PAGE_WIDTH / 2.0;
const RIGHT_X: f32 = PAGE_WIDTH - MARGIN_X;
const TABLE_TOP: f32 = 82.0;
const CONTINUED_TOP: f32 = 20.0;
const TABLE_BOTTOM_LIMIT: f32 = PAGE_HEIGHT - 20.0;
const SUMMARY_GAP: f32 = 10.0;
const SUMMARY_LINE: f32 = 7.0;
const SUMMARY_HEIGHT: f32 = 6.0 * SUMMARY_LINE + 4.0;
pub const ADDENDUM_LINE: f32 = 6.0;
pub const SIGNATURE_Y: f32 = PAGE_HEIGHT - 55.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 12.0;

/// Letterhead with every blank filled from the business defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Letterhead {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub addendum: Option<String>,
}

impl Letterhead {
    pub fn resolve(company: Option<&Company>) -> Self {
        let pick = |value: Option<&String>, fallback: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };
        let company = company.cloned().unwrap_or_default();
        Self {
            name: pick(company.name.as_ref(), DEFAULT_NAME),
            address: pick(company.address.as_ref(), DEFAULT_ADDRESS),
            phone: pick(company.phone.as_ref(), DEFAULT_PHONE),
            email: pick(company.email.as_ref(), DEFAULT_EMAIL),
            tax_id: pick(company.tax_id.as_ref(), DEFAULT_TAX_ID),
            addendum: company.addendum.filter(|a| !a.trim().is_empty()),
        }
    }
}

struct Layout {
    pages: Vec<Page>,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
    }

    fn push(&mut self, element: Element) {
        let last = self.pages.len() - 1;
        self.pages[last].elements.push(element);
    }

    fn text(&mut self, x: f32, y: f32, content: impl Into<String>, size: f32, align: Align) {
        self.push(Element::Text(TextBlock {
            x,
            y,
            content: content.into(),
            size,
            bold: false,
            italic: false,
            align,
        }));
    }

    fn styled(&mut self, x: f32, y: f32, content: impl Into<String>, size: f32, align: Align, bold: bool, italic: bool) {
        self.push(Element::Text(TextBlock {
            x,
            y,
            content: content.into(),
            size,
            bold,
            italic,
            align,
        }));
    }

    fn header_row(&mut self, y: f32) {
        self.push(Element::Row(TableRow {
            y,
            header: true,
            cells: COLUMNS.iter().map(|c| c.title.to_string()).collect(),
        }));
    }
}

/// Lay out a sales invoice for `order`. Line items are printed in the order
/// given; every figure is copied from the inputs, never recomputed, except
/// outstanding containers (issued − returned).
pub fn generate(order: &Order, items: &[OrderItem], company: Option<&Company>) -> InvoiceDocument {
    let letterhead = Letterhead::resolve(company);
    let mut layout = Layout::new();

    // Header
    layout.styled(CENTER_X, 15.0, &letterhead.name, 16.0, Align::Center, true, false);
    layout.text(CENTER_X, 23.0, &letterhead.address, 9.0, Align::Center);
    layout.text(
        CENTER_X,
        28.0,
        format!("Điện thoại: {} - Email: {}", letterhead.phone, letterhead.email),
        9.0,
        Align::Center,
    );
    layout.text(CENTER_X, 33.0, format!("MST: {}", letterhead.tax_id), 9.0, Align::Center);
    layout.push(Element::Rule { y: 39.0 });

    layout.styled(CENTER_X, 46.0, TITLE, 14.0, Align::Center, true, false);

    // Metadata
    let order_date = order
        .order_date
        .map(|ts| format_datetime(&ts.with_timezone(&Local)))
        .unwrap_or_default();
    layout.text(MARGIN_X, 58.0, format!("Mã hóa đơn: #{}", order.id), 10.0, Align::Left);
    layout.text(MARGIN_X, 64.0, format!("Ngày: {order_date}"), 10.0, Align::Left);
    layout.text(MARGIN_X, 70.0, format!("Khách hàng: {}", order.customer_name), 10.0, Align::Left);

    // Item table
    let mut y = TABLE_TOP;
    layout.header_row(y);
    y += ROW_HEIGHT;
    for (idx, item) in items.iter().enumerate() {
        if y + ROW_HEIGHT > TABLE_BOTTOM_LIMIT {
            layout.new_page();
            y = CONTINUED_TOP;
            layout.header_row(y);
            y += ROW_HEIGHT;
        }
        layout.push(Element::Row(TableRow {
            y,
            header: false,
            cells: vec![
                (idx + 1).to_string(),
                item.product_name.clone(),
                format_quantity(item.quantity),
                format_vnd(item.unit_price),
                format_vnd(item.total),
            ],
        }));
        y += ROW_HEIGHT;
    }
    let table_end = TableEnd {
        page: layout.page_index(),
        y,
    };

    // Summary and addendum stay together below the table, or move to a fresh
    // page when they would hit the signatures
    let addendum_height = letterhead
        .addendum
        .as_ref()
        .map(|a| a.lines().count() as f32 * ADDENDUM_LINE + 2.0)
        .unwrap_or(0.0);
    let mut y = table_end.y + SUMMARY_GAP;
    if y + SUMMARY_HEIGHT + addendum_height > SIGNATURE_Y - 5.0 {
        layout.new_page();
        y = CONTINUED_TOP;
    }

    let summary = vec![
        (LABEL_TOTAL.to_string(), format_vnd(order.total_amount)),
        (LABEL_PAID.to_string(), format_vnd(order.paid_amount)),
        (LABEL_DEBT.to_string(), format_vnd(order.debt_remaining)),
        (LABEL_RETURNABLE_OUT.to_string(), format_grouped(order.returnable_out)),
        (LABEL_RETURNABLE_IN.to_string(), format_grouped(order.returnable_in)),
        (LABEL_RETURNABLE_OWED.to_string(), format_grouped(order.returnable_outstanding())),
    ];

    for (idx, (label, value)) in summary.iter().enumerate() {
        if idx == 3 {
            y += 4.0;
        }
        let bold = label == LABEL_TOTAL || label == LABEL_DEBT;
        layout.styled(120.0, y, format!("{label}:"), 10.0, Align::Left, bold, false);
        layout.styled(RIGHT_X, y, value.clone(), 10.0, Align::Right, bold, false);
        y += SUMMARY_LINE;
    }

    // Addendum; its length is the caller's responsibility
    if let Some(addendum) = &letterhead.addendum {
        y += 2.0;
        for line in addendum.lines() {
            layout.styled(MARGIN_X, y, line, 9.0, Align::Left, false, true);
            y += ADDENDUM_LINE;
        }
    }

    // Signatures
    layout.styled(60.0, SIGNATURE_Y, "Người mua hàng", 10.0, Align::Center, true, false);
    layout.styled(150.0, SIGNATURE_Y, "Người bán hàng", 10.0, Align::Center, true, false);
    layout.styled(60.0, SIGNATURE_Y + 5.0, "(Ký, ghi rõ họ tên)", 8.0, Align::Center, false, true);
    layout.styled(150.0, SIGNATURE_Y + 5.0, "(Ký, ghi rõ họ tên)", 8.0, Align::Center, false, true);

    layout.styled(CENTER_X, FOOTER_Y, FOOTER, 9.0, Align::Center, false, true);

    tracing::debug!(
        order = %order.id,
        items = items.len(),
        pages = layout.pages.len(),
        "invoice laid out"
    );

    InvoiceDocument {
        order_id: order.id.clone(),
        title: format!("{TITLE} #{}", order.id),
        page_width: PAGE_WIDTH,
        page_height: PAGE_HEIGHT,
        row_height: ROW_HEIGHT,
        columns: COLUMNS.to_vec(),
        pages: layout.pages,
        table_end,
        summary,
    }
}
