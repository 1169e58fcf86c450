use crate::models::{CountRow, CountTable, MoodRecord, Selection, ViewKind};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Filters the log and counts moods for display.
///
/// With no moods selected only entries dated `today` are counted, by mood.
/// Otherwise the selected moods are counted across the whole history, either
/// by mood or pivoted into one row per day. Entries without a readable date
/// never appear in the date-based views but still count in the by-mood view.
pub fn filter_and_count(records: &[MoodRecord], selection: &Selection, today: NaiveDate) -> CountTable {
    if selection.is_default_view() {
        let todays = records.iter().filter(|record| record.date() == Some(today));
        return count_by_mood(ViewKind::Today, todays);
    }

    let selected = records.iter().filter(|record| selection.contains(&record.mood));
    if selection.group_by_day {
        count_by_day(selected)
    } else {
        count_by_mood(ViewKind::Overall, selected)
    }
}

/// Moods present in the log, in order of first appearance.
pub fn unique_moods(records: &[MoodRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in records {
        if !seen.contains(&record.mood) {
            seen.push(record.mood.clone());
        }
    }
    seen
}

fn count_by_mood<'a>(view: ViewKind, records: impl Iterator<Item = &'a MoodRecord>) -> CountTable {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.mood.as_str()).or_default() += 1;
    }

    CountTable {
        view,
        index: "mood".to_string(),
        columns: if counts.is_empty() {
            Vec::new()
        } else {
            vec!["count".to_string()]
        },
        rows: counts
            .into_iter()
            .map(|(mood, count)| CountRow {
                label: mood.to_string(),
                counts: vec![count],
            })
            .collect(),
    }
}

fn count_by_day<'a>(records: impl Iterator<Item = &'a MoodRecord>) -> CountTable {
    let mut columns: Vec<String> = Vec::new();
    let mut cells: BTreeMap<NaiveDate, HashMap<usize, u64>> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date() else {
            continue;
        };
        let col = match columns.iter().position(|mood| *mood == record.mood) {
            Some(col) => col,
            None => {
                columns.push(record.mood.clone());
                columns.len() - 1
            }
        };
        *cells.entry(date).or_default().entry(col).or_default() += 1;
    }

    let rows = cells
        .into_iter()
        .map(|(date, by_col)| CountRow {
            label: date.to_string(),
            counts: (0..columns.len())
                .map(|col| by_col.get(&col).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    CountTable {
        view: ViewKind::ByDay,
        index: "date".to_string(),
        columns,
        rows,
    }
}
