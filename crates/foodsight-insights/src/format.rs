//! Number formatting and the markup conventions the chat UI renders.
//!
//! Currency is whole pesos with comma thousands separators (`$1,234,567`),
//! percentages carry one decimal (`12.5%`). Non-finite inputs render as zero.

/// Group the digits of a non-negative integer with commas.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `$1,234,567`, rounded to whole pesos.
pub fn money(value: f64) -> String {
    let rounded = finite(value).round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// `1,234` for unit counts.
pub fn units(value: u64) -> String {
    group_thousands(value)
}

/// `12.5%`.
pub fn pct(value: f64) -> String {
    format!("{:.1}%", finite(value))
}

/// `+6.2%` / `-3.8%`.
pub fn signed_pct(value: f64) -> String {
    let v = finite(value);
    if v > 0.0 {
        format!("+{:.1}%", v)
    } else {
        format!("{:.1}%", v)
    }
}

pub fn positive(text: &str) -> String {
    format!("<span class=\"performance-positive\">{}</span>", text)
}

pub fn negative(text: &str) -> String {
    format!("<span class=\"performance-negative\">{}</span>", text)
}

pub fn neutral(text: &str) -> String {
    format!("<span class=\"performance-neutral\">{}</span>", text)
}

pub fn strong(text: &str) -> String {
    format!("<strong>{}</strong>", text)
}

/// Signed percentage wrapped in the span matching its direction.
pub fn trend(value: f64) -> String {
    let text = signed_pct(value);
    if value > 0.0 {
        positive(&text)
    } else if value < 0.0 {
        negative(&text)
    } else {
        neutral(&text)
    }
}

/// Attainment against 100%: at or above is positive, within 5 points is
/// neutral, anything lower is negative.
pub fn attainment(value: f64) -> String {
    let text = pct(value);
    if value >= 100.0 {
        positive(&text)
    } else if value >= 95.0 {
        neutral(&text)
    } else {
        negative(&text)
    }
}

/// `• item<br>` lines joined into one block.
pub fn bullets<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| format!("• {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// `1. item<br>2. item` numbered lines.
pub fn numbered<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("<br>")
}
