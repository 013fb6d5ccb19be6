use crate::dashboard::*;
use crate::stats::{StatSeries, SubscriptionGrid, SubscriptionType};
use crate::timeline::SubscriptionTimeline;
use anyhow::Result;
use unicode_width::UnicodeWidthStr;

/// Widest bar drawn for the largest value of a series.
const BAR_WIDTH: usize = 30;

/// Render a dashboard to Markdown with text bar charts.
pub fn render(dashboard: &Dashboard) -> Result<String> {
    let mut output = String::new();

    match dashboard {
        Dashboard::Admin(admin) => {
            render_header(&mut output, "All users", &admin.generated_at);
            render_series_panel(&mut output, &admin.categories);
            render_grid_panel(&mut output, &admin.subscriptions);
            render_timeline_panel(&mut output, &admin.timeline);
            render_series_panel(&mut output, &admin.weekly);
        }
        Dashboard::User(user) => {
            render_header(&mut output, &user.scope.to_string(), &user.generated_at);
            render_series_panel(&mut output, &user.weekly);
            render_series_panel(&mut output, &user.monthly);
            render_series_panel(&mut output, &user.all_time);
        }
        Dashboard::Timeline(panel) => {
            render_header(&mut output, "Subscriptions", &panel.window.to.to_string());
            render_timeline_panel(&mut output, panel);
        }
    }

    Ok(output)
}

fn render_header(output: &mut String, subject: &str, generated_at: &str) {
    output.push_str(&format!("# 🏋️ Gym statistics: {}\n", subject));
    output.push_str(&format!("*Generated {}*\n\n", generated_at));
}

fn render_series_panel(output: &mut String, panel: &SeriesPanel) {
    output.push_str(&format!("### 📊 {}: {}\n", panel.title, panel.period));
    render_bars(output, &panel.series);
    output.push_str(&format!("- **Total:** {}\n", panel.total_display));
    if let Some(offset) = panel.offset {
        output.push_str(&format!("- **Offset:** {}\n", offset));
    }
    output.push('\n');
}

fn render_bars(output: &mut String, series: &StatSeries) {
    if series.is_empty() {
        output.push_str("*No data available*\n");
        return;
    }

    let label_width = series.keys().map(|k| k.width()).max().unwrap_or(0);
    let max = series.max_value();

    output.push_str("```text\n");
    for point in &series.points {
        let len = if max > 0.0 {
            ((point.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        output.push_str(&format!(
            "{} {} {}\n",
            pad_to_width(&point.key, label_width),
            "█".repeat(len),
            format_number(point.value)
        ));
    }
    output.push_str("```\n");
}

fn render_grid_panel(output: &mut String, panel: &GridPanel) {
    output.push_str(&format!("### 🧩 {}: {}\n", panel.title, panel.period));
    render_grid(output, &panel.grid);
    output.push_str(&format!("- **Total:** {}\n", panel.total_display));
    output.push_str(&format!("- **Offset:** {}\n\n", panel.offset));
}

fn render_grid(output: &mut String, grid: &SubscriptionGrid) {
    let categories = grid.categories();
    if categories.is_empty() {
        output.push_str("*No data available*\n");
        return;
    }

    output.push_str("| Category |");
    for kind in SubscriptionType::ALL {
        output.push_str(&format!(" {} |", kind));
    }
    output.push_str("\n| -------- |");
    for _ in SubscriptionType::ALL {
        output.push_str(" --- |");
    }
    output.push('\n');

    for category in categories {
        output.push_str(&format!("| {} |", category));
        for kind in SubscriptionType::ALL {
            let value = grid.get(category, kind).unwrap_or(0.0);
            output.push_str(&format!(" {} |", format_number(value)));
        }
        output.push('\n');
    }
}

fn render_timeline_panel(output: &mut String, panel: &TimelinePanel) {
    output.push_str(&format!("### 📈 {}: {}\n", panel.title, panel.window.label));
    render_timeline(output, &panel.timeline);
    output.push_str(&format!("- {}\n\n", panel.summary_display));
}

fn render_timeline(output: &mut String, timeline: &SubscriptionTimeline) {
    if timeline.is_empty() {
        output.push_str("*No data available*\n");
        return;
    }

    output.push_str("| Month |");
    for line in &timeline.lines {
        output.push_str(&format!(" {} |", line.subscription_type));
    }
    output.push_str("\n| ----- |");
    for _ in &timeline.lines {
        output.push_str(" --- |");
    }
    output.push('\n');

    for month in &timeline.months {
        output.push_str(&format!("| {} |", month.label));
        for line in &timeline.lines {
            match line.value_at(&month.month_year) {
                Some(value) => output.push_str(&format!(" {} |", format_number(value))),
                None => output.push_str(" - |"),
            }
        }
        output.push('\n');
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(pad))
}

/// Whole minutes with thousands separators.
fn format_number(minutes: f64) -> String {
    let n = minutes.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}
