use crate::analysis::{ChartKind, ChartPayload};

use super::message::{ChatMessage, Sender};

const BAR_WIDTH: usize = 30;

/// Plain-text rendering of one message for a terminal.
pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.sender {
        Sender::User => "You",
        Sender::Bot => "Dedge",
    };

    let mut out = format!("{speaker}:\n{}", message.text);
    if let Some(chart) = &message.chart {
        out.push_str("\n\n");
        out.push_str(&render_chart(chart));
    }
    out
}

/// Horizontal bars scaled to the largest value; pie charts also show shares.
pub fn render_chart(chart: &ChartPayload) -> String {
    let kind = match chart.kind() {
        ChartKind::Pie => "pie",
        ChartKind::Bar => "bar",
    };
    let mut lines = vec![format!("[{} chart] {}", kind, chart.title().unwrap_or_default())];

    let label_width = chart.labels().iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = chart.values().iter().copied().fold(0.0_f64, f64::max);
    let total: f64 = chart.values().iter().sum();

    for (label, value) in chart.points() {
        let filled = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let mut line = format!(
            "{label:<label_width$} | {} {}",
            "█".repeat(filled),
            format_value(value)
        );
        if chart.kind() == ChartKind::Pie && total > 0.0 {
            line.push_str(&format!(" ({:.1}%)", value / total * 100.0));
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
