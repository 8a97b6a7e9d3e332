//! HTML pages. Every interpolated value goes through `escape`.

use std::fmt::Write;

use axum::http::StatusCode;

use crate::market::OptionSide;
use crate::report::{LadderReport, headers};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse}\
th,td{border:1px solid #999;padding:4px 10px;text-align:right}\
th{background:#eee}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

fn side_noun(side: OptionSide) -> &'static str {
    match side {
        OptionSide::Call => "Calls",
        OptionSide::Put => "Puts",
    }
}

pub fn index_page() -> String {
    layout(
        "Options Ladder",
        "<h1>Options Ladder</h1>\n\
         <ul>\n\
         <li><a href=\"/calls\">Calls</a>: strikes above the current price</li>\n\
         <li><a href=\"/puts\">Puts</a>: strikes below the current price</li>\n\
         </ul>\n",
    )
}

pub fn form_page(side: OptionSide) -> String {
    let noun = side_noun(side);
    let action = match side {
        OptionSide::Call => "/calls",
        OptionSide::Put => "/puts",
    };
    let body = format!(
        "<h1>{noun}</h1>\n\
         <form action=\"{action}\" method=\"post\">\n\
         <p><label>Ticker <input type=\"text\" name=\"ticker_1\" required></label></p>\n\
         <p><label>Expiration # <input type=\"number\" name=\"date_1\" min=\"1\" value=\"1\" required></label></p>\n\
         <p><label>Years <input type=\"number\" name=\"years_1\" min=\"0\" value=\"1\" required></label></p>\n\
         <p><input type=\"submit\" value=\"Build ladder\"></p>\n\
         </form>\n\
         <p><a href=\"/\">Home</a></p>\n"
    );
    layout(noun, &body)
}

pub fn ladder_page(report: &LadderReport) -> String {
    let mut body = String::new();
    let symbol = escape(&report.symbol);

    // Writing to a String cannot fail.
    let _ = writeln!(body, "<h1>{symbol} {}</h1>", side_noun(report.side));
    let _ = writeln!(
        body,
        "<p>Current price: <b>{:.2}</b><br>\nExpiration: <b>{}</b> (#{})<br>\nYears: <b>{}</b></p>",
        report.current_price, report.expiration.date, report.expiration_index, report.horizon_years
    );

    body.push_str("<table>\n<thead>\n<tr>");
    for header in headers(report.side) {
        let _ = write!(body, "<th>{}</th>", escape(header));
    }
    body.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &report.rows {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{}%</td></tr>",
            row.percent_step, row.price_delta, row.matched_strike, row.premium, row.risk_ratio
        );
    }
    body.push_str("</tbody>\n</table>\n");

    let back = match report.side {
        OptionSide::Call => "/calls",
        OptionSide::Put => "/puts",
    };
    let _ = writeln!(body, "<p><a href=\"{back}\">New search</a> | <a href=\"/\">Home</a></p>");

    layout(&format!("{} {}", report.symbol, side_noun(report.side)), &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Home</a></p>\n",
        status.as_u16(),
        escape(reason),
        escape(message)
    );
    layout("Request failed", &body)
}
