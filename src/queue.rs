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

//! The persistent review queues.
//!
//! Every mutation is a whole-sheet read-modify-write cycle with
//! last-writer-wins semantics. There is no conflict detection against a
//! second writer on the same workbook; that is the accepted contract.

use std::collections::HashMap;

use crate::error::Fallible;
use crate::store::StoreError;
use crate::store::Table;
use crate::store::Workbook;
use crate::store::normalize;
use crate::types::card::Card;

/// Column layout shared by both queue sheets.
pub const QUEUE_COLUMNS: [&str; 3] = ["Question", "Answer", "Source"];

/// The two reserved sheets cards are saved back into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueKind {
    /// Missed answers from learn sessions.
    Review,
    /// Cards flagged as uncertain, by hand or by hint use.
    Unsure,
}

impl QueueKind {
    pub fn sheet_name(self) -> &'static str {
        match self {
            QueueKind::Review => "Review",
            QueueKind::Unsure => "Unsure",
        }
    }

    /// Whether the named sheet is one of the reserved queue sheets.
    pub fn is_queue_sheet(name: &str) -> bool {
        name == QueueKind::Review.sheet_name() || name == QueueKind::Unsure.sheet_name()
    }
}

/// Manager for the persistent review queues.
#[derive(Clone)]
pub struct Queues {
    workbook: Workbook,
}

impl Queues {
    pub fn new(workbook: Workbook) -> Self {
        Self { workbook }
    }

    /// Every card currently in a queue. An absent sheet is an empty queue.
    pub fn cards(&self, kind: QueueKind) -> Fallible<Vec<Card>> {
        match self.workbook.read_sheet(kind.sheet_name()) {
            Ok(table) => Ok(normalize(&table, kind.sheet_name())?),
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// The distinct sources present in a queue, sorted.
    pub fn sources(&self, kind: QueueKind) -> Fallible<Vec<String>> {
        let mut sources: Vec<String> = self
            .cards(kind)?
            .into_iter()
            .map(|card| card.source)
            .collect();
        sources.sort();
        sources.dedup();
        Ok(sources)
    }

    /// Append a card to a queue, deduplicating by question text. A re-save
    /// of an existing question overwrites its stored answer and source and
    /// moves the row to the end.
    pub fn append_unique(&self, kind: QueueKind, card: &Card) -> Fallible<()> {
        let mut cards = self.cards(kind)?;
        cards.push(card.clone());
        let cards = dedup_by_question(cards);
        self.write(kind, &cards)
    }

    /// Remove every row whose trimmed question equals `question` (trimmed).
    /// The sheet is rewritten only when something was removed. Returns
    /// whether a removal occurred.
    pub fn remove(&self, kind: QueueKind, question: &str) -> Fallible<bool> {
        let cards = self.cards(kind)?;
        let question = question.trim();
        let kept: Vec<Card> = cards
            .iter()
            .filter(|card| card.question.trim() != question)
            .cloned()
            .collect();
        if kept.len() == cards.len() {
            return Ok(false);
        }
        self.write(kind, &kept)?;
        Ok(true)
    }

    fn write(&self, kind: QueueKind, cards: &[Card]) -> Fallible<()> {
        let table = Table {
            columns: QUEUE_COLUMNS.iter().map(|column| column.to_string()).collect(),
            rows: cards
                .iter()
                .map(|card| {
                    vec![
                        card.question.clone(),
                        card.answer.clone(),
                        card.source.clone(),
                    ]
                })
                .collect(),
        };
        self.workbook.write_sheet(kind.sheet_name(), &table)?;
        Ok(())
    }
}

/// Keep the last occurrence of each question, at its last position.
fn dedup_by_question(cards: Vec<Card>) -> Vec<Card> {
    let mut last_index: HashMap<String, usize> = HashMap::new();
    for (index, card) in cards.iter().enumerate() {
        last_index.insert(card.question.clone(), index);
    }
    cards
        .into_iter()
        .enumerate()
        .filter(|(index, card)| last_index[&card.question] == *index)
        .map(|(_, card)| card)
        .collect()
}
