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

use crate::queue::QueueKind;

/// Which pair of columns a unit sheet is drilled on. Part 1 is columns
/// (0, 1), part 2 is columns (2, 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    One,
    Two,
}

impl Part {
    pub fn number(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Part::One),
            2 => Some(Part::Two),
            _ => None,
        }
    }
}

impl Display for Part {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part {}", self.number())
    }
}

/// What kind of deck the session is drilling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudyMode {
    /// Drilling a unit sheet. Misses are recorded in the Review queue.
    Learn { unit: String, part: Part },
    /// Re-drilling previously missed cards.
    ReviewWrong,
    /// Re-drilling cards flagged as uncertain.
    ReviewUnsure,
}

impl StudyMode {
    /// Using a hint flags the card as uncertain, unless the deck already
    /// came from the Unsure queue.
    pub fn saves_on_hint(&self) -> bool {
        !matches!(self, StudyMode::ReviewUnsure)
    }

    /// Misses go to the Review queue only when learning new material.
    pub fn records_misses(&self) -> bool {
        matches!(self, StudyMode::Learn { .. })
    }

    /// The queue a mastered card is removed from.
    pub fn mastery_queue(&self) -> Option<QueueKind> {
        match self {
            StudyMode::Learn { .. } => None,
            StudyMode::ReviewWrong => Some(QueueKind::Review),
            StudyMode::ReviewUnsure => Some(QueueKind::Unsure),
        }
    }

    pub fn title(&self) -> String {
        match self {
            StudyMode::Learn { unit, part } => format!("{unit} ({part})"),
            StudyMode::ReviewWrong => "Review".to_string(),
            StudyMode::ReviewUnsure => "Unsure".to_string(),
        }
    }
}
