//! Plain CSV rendering for downloadable restock reports.

use rust_decimal::Decimal;

use crate::forecast::{RestockTotal, round2};

pub const RESTOCK_REPORT_FILENAME: &str = "restock_report.csv";
pub const CUSTOMIZED_REPORT_FILENAME: &str = "customized_restock_report.csv";
pub const CONTENT_TYPE: &str = "text/csv";

const RESTOCK_HEADERS: [&str; 2] = ["title", "total_restock_amount"];

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header line followed by one line per row, each terminated by `\n`.
pub fn to_csv<I, R>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut out = String::new();
    push_line(&mut out, headers.iter().map(|h| h.to_string()));
    for row in rows {
        push_line(&mut out, row);
    }
    out
}

fn push_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let line: Vec<String> = fields.into_iter().map(|f| escape_field(&f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Always two decimal places, so `14` renders as `14.00`.
fn money(value: Decimal) -> String {
    let mut value = round2(value);
    value.rescale(2);
    value.to_string()
}

/// `title,total_restock_amount` table in forecast order.
pub fn restock_totals(totals: &[RestockTotal]) -> String {
    to_csv(
        &RESTOCK_HEADERS,
        totals
            .iter()
            .map(|t| [t.title.clone(), money(t.total_restock_amount)]),
    )
}
