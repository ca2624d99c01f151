use std::collections::HashMap;

use crate::models::{DepartureGroup, DepartureRow};

/// Fold rows into destination groups, in first-seen destination order.
///
/// The first row for a destination creates its group with that row's time,
/// even when the time is empty. Later rows only append non-empty times.
pub fn group_departures(rows: impl IntoIterator<Item = DepartureRow>) -> Vec<DepartureGroup> {
    let mut groups: Vec<DepartureGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match index.get(&row.destination) {
            Some(&i) => {
                if !row.estimated_time.is_empty() {
                    groups[i].estimated_times.push(row.estimated_time);
                }
            }
            None => {
                index.insert(row.destination.clone(), groups.len());
                groups.push(DepartureGroup {
                    destination: row.destination,
                    estimated_times: vec![row.estimated_time],
                });
            }
        }
    }

    groups
}
