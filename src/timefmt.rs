use indexmap::IndexMap;

use crate::stats::{Minutes, SubscriptionType};

/// Format a minute count as "H hours M minutes", dropping a zero unit.
///
/// `None` and zero render as "0 hours 0 minutes". Fractional minutes are rounded.
pub fn format_minutes(total_minutes: Option<Minutes>) -> String {
    let total = match total_minutes {
        Some(m) if m != 0.0 && m.is_finite() => m,
        _ => return "0 hours 0 minutes".to_string(),
    };

    let minutes = total.round().max(0.0) as u64;
    let hours = minutes / 60;
    let remainder = minutes % 60;

    match (hours, remainder) {
        (h, m) if h > 0 && m > 0 => format!("{} {}", unit(h, "hour"), unit(m, "minute")),
        (h, _) if h > 0 => unit(h, "hour"),
        (_, m) => unit(m, "minute"),
    }
}

/// One-line summary such as "standard: 1 hour, premium: 5 minutes".
///
/// Dashboard summaries always carry all three subscription types; an empty map
/// only comes from callers passing a sparse summary and renders as
/// "No data available".
pub fn format_subscription_summary(summary: &IndexMap<SubscriptionType, Minutes>) -> String {
    if summary.is_empty() {
        return "No data available".to_string();
    }

    summary
        .iter()
        .map(|(kind, minutes)| format!("{}: {}", kind, format_minutes(Some(*minutes))))
        .collect::<Vec<_>>()
        .join(", ")
}

fn unit(n: u64, singular: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}s", n, singular)
    }
}
