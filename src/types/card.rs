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

/// One question/answer pair with a provenance label.
///
/// Cards are immutable once loaded into a session. Their identity, for
/// queue deduplication, is the question text: case-sensitive and
/// whitespace-preserving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub question: String,
    pub answer: String,
    /// The unit, part, or queue the card came from.
    pub source: String,
}

impl Card {
    /// Source label for rows that carry none.
    pub const UNKNOWN_SOURCE: &'static str = "Unknown";

    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            source: source.into(),
        }
    }
}
