mod document;
mod format;
mod generator;

pub use document::{
    Align, Column, Element, InvoiceDocument, Page, TableEnd, TableRow, TextBlock, COLUMNS,
    PAGE_HEIGHT, PAGE_WIDTH, ROW_HEIGHT,
};
pub use format::{format_date, format_datetime, format_grouped, format_quantity, format_vnd};
pub use generator::{
    generate, Letterhead, ADDENDUM_LINE, FOOTER, LABEL_DEBT, LABEL_PAID, LABEL_RETURNABLE_IN,
    LABEL_RETURNABLE_OUT, LABEL_RETURNABLE_OWED, LABEL_TOTAL, SIGNATURE_Y, TITLE,
};
