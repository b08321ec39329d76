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

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::error::Fallible;
use crate::queue::QueueKind;
use crate::queue::Queues;
use crate::store::StoreError;
use crate::store::Table;
use crate::store::Workbook;
use crate::store::normalize;
use crate::types::card::Card;
use crate::types::mode::Part;

/// The source filter value that keeps every card.
pub const ALL_SOURCES: &str = "All";

/// A shuffled sequence of cards for one study session. Owned by the session
/// and discarded when a new deck is loaded.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Materialize a deck with a uniform random permutation of the cards.
    pub fn shuffled(mut cards: Vec<Card>) -> Self {
        cards.shuffle(&mut thread_rng());
        Self { cards }
    }

    pub fn reshuffle(&mut self) {
        self.cards.shuffle(&mut thread_rng());
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Restrict a raw unit table to the column pair of one part.
pub fn select_part(table: &Table, part: Part) -> Result<Table, StoreError> {
    let (first, second) = match part {
        Part::One => (0, 1),
        Part::Two => (2, 3),
    };
    if table.width() <= second {
        return Err(StoreError::Schema {
            columns: table.width(),
        });
    }
    let columns = vec![table.columns[first].clone(), table.columns[second].clone()];
    let rows = table
        .rows
        .iter()
        .map(|row| {
            vec![
                row.get(first).cloned().unwrap_or_default(),
                row.get(second).cloned().unwrap_or_default(),
            ]
        })
        .collect();
    Ok(Table::new(columns, rows))
}

/// Load a unit sheet as a shuffled deck, drilling the selected column pair.
/// An empty unit yields an empty deck, not an error.
pub fn load_learn_deck(workbook: &Workbook, unit: &str, part: Part) -> Fallible<Deck> {
    let table = workbook.read_sheet(unit)?;
    let table = select_part(&table, part)?;
    let default_source = format!("{unit} ({part})");
    let cards = normalize(&table, &default_source)?;
    log::debug!("Loaded {} cards from {unit} ({part}).", cards.len());
    Ok(Deck::shuffled(cards))
}

/// Load a queue sheet as a shuffled deck, optionally filtered to one source.
/// An absent queue sheet yields an empty deck.
pub fn load_queue_deck(queues: &Queues, kind: QueueKind, source_filter: &str) -> Fallible<Deck> {
    let cards = queues.cards(kind)?;
    let cards: Vec<Card> = if source_filter == ALL_SOURCES {
        cards
    } else {
        cards
            .into_iter()
            .filter(|card| card.source == source_filter)
            .collect()
    };
    log::debug!(
        "Loaded {} cards from the {} queue (filter: {source_filter}).",
        cards.len(),
        kind.sheet_name()
    );
    Ok(Deck::shuffled(cards))
}

/// The sheets a learner can study: everything except the queue sheets.
pub fn list_units(workbook: &Workbook) -> Fallible<Vec<String>> {
    let sheets = workbook.list_sheets()?;
    Ok(sheets
        .into_iter()
        .filter(|sheet| !QueueKind::is_queue_sheet(sheet))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tempfile::tempdir;

    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_shuffle_preserves_cards() {
        let cards: Vec<Card> = (0..50)
            .map(|n| Card::new(format!("q{n}"), format!("a{n}"), "U1"))
            .collect();
        let deck = Deck::shuffled(cards.clone());
        assert_eq!(deck.len(), 50);
        let questions: HashSet<&str> = deck.cards().iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions.len(), 50);
        assert!(cards.iter().all(|c| questions.contains(c.question.as_str())));
    }

    #[test]
    fn test_select_part_one() {
        let raw = table(
            &["Word", "Meaning", "Phrase", "Translation"],
            &[&["dog", "chó", "a big dog", "một con chó to"]],
        );
        let selected = select_part(&raw, Part::One).unwrap();
        assert_eq!(selected.columns, vec!["Word", "Meaning"]);
        assert_eq!(selected.rows, vec![vec!["dog", "chó"]]);
    }

    #[test]
    fn test_select_part_two() {
        let raw = table(
            &["Word", "Meaning", "Phrase", "Translation"],
            &[&["dog", "chó", "a big dog", "một con chó to"]],
        );
        let selected = select_part(&raw, Part::Two).unwrap();
        assert_eq!(selected.rows, vec![vec!["a big dog", "một con chó to"]]);
    }

    #[test]
    fn test_select_part_two_on_narrow_table() {
        let raw = table(&["Word", "Meaning"], &[&["dog", "chó"]]);
        let result = select_part(&raw, Part::Two);
        assert!(matches!(result, Err(StoreError::Schema { columns: 2 })));
    }

    #[test]
    fn test_load_learn_deck_sets_source() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        workbook
            .write_sheet("Unit 1", &table(&["Word", "Meaning"], &[&["dog", "chó"]]))
            .unwrap();
        let deck = load_learn_deck(&workbook, "Unit 1", Part::One).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.get(0).unwrap().source, "Unit 1 (Part 1)");
    }

    #[test]
    fn test_load_learn_deck_empty_unit() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        workbook
            .write_sheet("Empty", &table(&["Word", "Meaning"], &[]))
            .unwrap();
        let deck = load_learn_deck(&workbook, "Empty", Part::One).unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn test_load_learn_deck_missing_unit() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        assert!(load_learn_deck(&workbook, "Nope", Part::One).is_err());
    }

    #[test]
    fn test_load_queue_deck_filters_by_source() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        let queues = Queues::new(workbook.clone());
        queues
            .append_unique(QueueKind::Review, &Card::new("q1", "a1", "U1"))
            .unwrap();
        queues
            .append_unique(QueueKind::Review, &Card::new("q2", "a2", "U2"))
            .unwrap();
        let all = load_queue_deck(&queues, QueueKind::Review, ALL_SOURCES).unwrap();
        assert_eq!(all.len(), 2);
        let filtered = load_queue_deck(&queues, QueueKind::Review, "U2").unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get(0).unwrap().question, "q2");
    }

    #[test]
    fn test_load_queue_deck_missing_sheet() {
        let dir = tempdir().unwrap();
        let queues = Queues::new(Workbook::new(dir.path()));
        let deck = load_queue_deck(&queues, QueueKind::Unsure, ALL_SOURCES).unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn test_list_units_excludes_queues() {
        let dir = tempdir().unwrap();
        let workbook = Workbook::new(dir.path());
        let empty = table(&["Question", "Answer"], &[]);
        workbook.write_sheet("Unit 1", &empty).unwrap();
        workbook.write_sheet("Review", &empty).unwrap();
        workbook.write_sheet("Unsure", &empty).unwrap();
        assert_eq!(list_units(&workbook).unwrap(), vec!["Unit 1".to_string()]);
    }
}
