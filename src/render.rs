//! Plain-text rendering of boards and widget snapshots.

use chrono::{DateTime, Local, Utc};

use crate::models::{AggregationResult, DepartureGroup, WidgetSnapshot, PLACEHOLDER};

/// Headings for the two buckets of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLabels {
    pub inbound: String,
    pub outbound: String,
}

impl Default for BucketLabels {
    fn default() -> Self {
        Self {
            inbound: "Retiro".to_string(),
            outbound: "Villa Rosa".to_string(),
        }
    }
}

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Render a board with one section per direction.
///
/// Example output:
/// ```text
/// Estación Villa Adelina
/// Updated: 10:02:31
///
/// Retiro
/// ├── RETIRO
/// │   ├── 10:05
/// │   └── 10:20
/// └── RETIRO (EXPRESO)
///     └── 10:12
///
/// Villa Rosa
/// └── (no departures)
/// ```
pub fn render_board(result: &AggregationResult, labels: &BucketLabels) -> String {
    let mut output = format!(
        "Estación {}\nUpdated: {}\n",
        result.station,
        clock(result.refreshed_at)
    );
    render_section(&mut output, &labels.inbound, &result.inbound);
    render_section(&mut output, &labels.outbound, &result.outbound);
    output
}

fn render_section(output: &mut String, heading: &str, groups: &[DepartureGroup]) {
    output.push('\n');
    output.push_str(heading);
    output.push('\n');

    if groups.is_empty() {
        output.push_str("└── (no departures)\n");
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        let is_last = i == groups.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(branch);
        output.push_str(&group.destination);
        output.push('\n');

        // The leading empty time a group can carry is not worth a line.
        let times: Vec<&str> = group
            .estimated_times
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        let prefix = if is_last { "    " } else { "│   " };
        for (j, time) in times.iter().enumerate() {
            let time_branch = if j == times.len() - 1 { "└── " } else { "├── " };
            output.push_str(prefix);
            output.push_str(time_branch);
            output.push_str(time);
            output.push('\n');
        }
    }
}

/// Render a widget snapshot as four short lines.
pub fn render_widget(snapshot: &WidgetSnapshot, labels: &BucketLabels) -> String {
    let refreshed = snapshot
        .refreshed_at
        .map(clock)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    format!(
        "Station: {}\nTo {}: {}\nTo {}: {}\nLast Refresh: {}\n",
        snapshot.station,
        labels.inbound,
        snapshot.inbound_display(),
        labels.outbound,
        snapshot.outbound_display(),
        refreshed
    )
}
