//! Message rendering for Telegram's HTML parse mode.

use super::payload::QuizResult;

pub const MESSAGE_TITLE: &str = "IDOKON Quiz";
pub const STATUS_PASSED: &str = "✅ Muvaffaqiyatli o‘tdi";
pub const STATUS_RETRY: &str = "⚠️ Qayta urinishi kerak";

/// Escape text for embedding in an HTML-mode message.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Round half toward positive infinity, so `2.5 -> 3` and `-2.5 -> -2`.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Render a number the way a browser would print it: `5`, `7.5`, `1e-7`,
/// `1e+21`, `NaN`, `Infinity`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if value == 0.0 {
        // covers -0.0
        "0".to_string()
    } else if value.abs() < 1e-6 || value.abs() >= 1e21 {
        let exponent = format!("{:e}", value);
        match exponent.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => exponent,
        }
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Percent shown in the message.
///
/// A zero `total` is not guarded: the result is NaN or infinite and is
/// rendered as such.
pub fn display_percent(result: &QuizResult) -> f64 {
    match result.percent {
        Some(percent) => percent,
        None => round_half_up(result.score / result.total * 100.0),
    }
}

pub fn status_line(passed: bool) -> &'static str {
    if passed {
        STATUS_PASSED
    } else {
        STATUS_RETRY
    }
}

/// Build the full message body for one quiz result.
pub fn render_message(result: &QuizResult) -> String {
    format!(
        "<b>{title}</b>\n\
         👤 <b>Ism:</b> {name}\n\
         📱 <b>Tel:</b> {phone}\n\
         🧮 <b>Natija:</b> {score}/{total} ({percent}%)\n\
         📌 {status}",
        title = MESSAGE_TITLE,
        name = escape_html(&result.name),
        phone = escape_html(&result.phone),
        score = format_number(result.score),
        total = format_number(result.total),
        percent = format_number(display_percent(result)),
        status = status_line(result.passed),
    )
}
