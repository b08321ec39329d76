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

use std::path::Path;

use crate::deck::list_units;
use crate::deck::select_part;
use crate::error::Fallible;
use crate::error::fail;
use crate::queue::QueueKind;
use crate::store::StoreError;
use crate::store::Workbook;
use crate::store::normalize;
use crate::types::mode::Part;

/// Validate that every sheet in the workbook can be loaded: each unit maps
/// onto the card schema for each of its parts, and both queue sheets (when
/// present) normalize cleanly. Prints one line per checked part and fails
/// if any sheet has a schema problem.
pub fn check_workbook(directory: &Path) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let workbook = Workbook::new(directory);
    let mut problems = 0usize;

    for unit in list_units(&workbook)? {
        let table = workbook.read_sheet(&unit)?;
        let parts: &[Part] = if table.width() >= 4 {
            &[Part::One, Part::Two]
        } else {
            &[Part::One]
        };
        for part in parts {
            match select_part(&table, *part).and_then(|selected| {
                let source = format!("{unit} ({part})");
                let cards = normalize(&selected, &source)?;
                Ok((selected.rows.len(), cards.len()))
            }) {
                Ok((rows, cards)) => {
                    let dropped = rows - cards;
                    if dropped > 0 {
                        println!("{unit} ({part}): {cards} cards, {dropped} rows dropped");
                    } else {
                        println!("{unit} ({part}): {cards} cards");
                    }
                }
                Err(err) => {
                    println!("{unit} ({part}): {err}");
                    problems += 1;
                }
            }
        }
    }

    for kind in [QueueKind::Review, QueueKind::Unsure] {
        let name = kind.sheet_name();
        match workbook.read_sheet(name) {
            Ok(table) => match normalize(&table, name) {
                Ok(cards) => println!("{name}: {} cards", cards.len()),
                Err(err) => {
                    println!("{name}: {err}");
                    problems += 1;
                }
            },
            Err(StoreError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }
    }

    if problems > 0 {
        return fail("workbook has schema problems.");
    }
    println!("ok");
    Ok(())
}
