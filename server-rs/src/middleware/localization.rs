use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    pub currency_symbol: &'static str,
    pub thousands_separator: char,
}

pub const INDONESIAN: LocaleInfo = LocaleInfo {
    currency_symbol: "Rp",
    thousands_separator: '.',
};

pub const ENGLISH: LocaleInfo = LocaleInfo {
    currency_symbol: "Rp",
    thousands_separator: ',',
};

impl Default for LocaleInfo {
    fn default() -> Self {
        INDONESIAN
    }
}

fn locale_config(tag: &str) -> LocaleInfo {
    let lang = tag.split(['-', '_']).next().unwrap_or_default();
    if lang.eq_ignore_ascii_case("en") {
        ENGLISH
    } else {
        INDONESIAN
    }
}

fn detect_locale(req: &Request) -> LocaleInfo {
    if let Some(query) = req.uri().query() {
        for pair in query.split('&') {
            let mut kv = pair.splitn(2, '=');
            if kv.next() == Some("locale") {
                if let Some(val) = kv.next() {
                    return locale_config(val);
                }
            }
        }
    }

    req.headers()
        .get("accept-language")
        .and_then(|v| v.to_str().ok())
        .and_then(|al| al.split(',').next())
        .map(|lang| locale_config(lang.split(';').next().unwrap_or_default().trim()))
        .unwrap_or_default()
}

/// Middleware: detects locale and attaches LocaleInfo to request.
pub async fn locale_detector(mut req: Request, next: Next) -> Result<Response, AppError> {
    let info = detect_locale(&req);
    req.extensions_mut().insert(info);
    Ok(next.run(req).await)
}

/// Rupiah has no minor unit in practice, so amounts are whole numbers.
pub fn format_amount(amount: i64, info: &LocaleInfo) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(info.thousands_separator);
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{} {grouped}", info.currency_symbol)
}
