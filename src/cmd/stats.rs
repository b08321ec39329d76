// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::deck::list_units;
use crate::deck::select_part;
use crate::error::Fallible;
use crate::error::fail;
use crate::queue::QueueKind;
use crate::queue::Queues;
use crate::store::Workbook;
use crate::store::normalize;
use crate::types::mode::Part;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    unit_count: usize,
    card_count: usize,
    review_queue_count: usize,
    unsure_queue_count: usize,
}

pub fn print_workbook_stats(directory: &Path, format: StatsFormat) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let workbook = Workbook::new(directory);
    let queues = Queues::new(workbook.clone());

    let units = list_units(&workbook)?;
    let mut card_count = 0;
    for unit in &units {
        let table = workbook.read_sheet(unit)?;
        let parts: &[Part] = if table.width() >= 4 {
            &[Part::One, Part::Two]
        } else {
            &[Part::One]
        };
        for part in parts {
            let selected = select_part(&table, *part)?;
            let source = format!("{unit} ({part})");
            card_count += normalize(&selected, &source)?.len();
        }
    }

    let stats = Stats {
        unit_count: units.len(),
        card_count,
        review_queue_count: queues.cards(QueueKind::Review)?.len(),
        unsure_queue_count: queues.cards(QueueKind::Unsure)?.len(),
    };

    match format {
        StatsFormat::Text => {
            println!("Units:  {}", stats.unit_count);
            println!("Cards:  {}", stats.card_count);
            println!("Review: {}", stats.review_queue_count);
            println!("Unsure: {}", stats.unsure_queue_count);
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::store::Table;
    use crate::types::card::Card;

    use super::*;

    #[test]
    fn test_non_existent_directory() {
        assert!(print_workbook_stats(Path::new("./derpherp"), StatsFormat::Text).is_err());
    }

    #[test]
    fn test_stats_over_workbook() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        workbook
            .write_sheet(
                "Unit 1",
                &Table::new(
                    vec![
                        "Word".to_string(),
                        "Meaning".to_string(),
                        "Phrase".to_string(),
                        "Translation".to_string(),
                    ],
                    vec![vec![
                        "dog".to_string(),
                        "chó".to_string(),
                        "a big dog".to_string(),
                        "một con chó to".to_string(),
                    ]],
                ),
            )
            .unwrap();
        let queues = Queues::new(workbook);
        queues
            .append_unique(QueueKind::Unsure, &Card::new("q", "a", "U1"))
            .unwrap();
        assert!(print_workbook_stats(dir.path(), StatsFormat::Json).is_ok());
    }
}
