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

//! The session state machine.
//!
//! Every transition is guarded by a validity precondition; an action that is
//! invalid in the current state is a no-op. The machine itself never fails:
//! persistence side effects (queue writes on misses, hints, and mastery) are
//! the caller's concern.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::deck::Deck;
use crate::types::answer::AnswerStatus;
use crate::types::card::Card;
use crate::types::mode::StudyMode;

/// Where the session is in its lifecycle. "Idle" is the absence of a
/// session, not a phase of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Completed,
}

/// The outcome of asking for a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintOutcome {
    /// One more character index is now revealed.
    Revealed(usize),
    /// Every letter is already revealed.
    Exhausted,
    /// Hints are not valid in the current state.
    NotAllowed,
}

/// One study session: a shuffled deck and the learner's progress through it.
pub struct Session {
    mode: StudyMode,
    deck: Deck,
    position: usize,
    score: usize,
    revealed: HashSet<usize>,
    status: AnswerStatus,
}

impl Session {
    pub fn start(mode: StudyMode, deck: Deck) -> Self {
        Self {
            mode,
            deck,
            position: 0,
            score: 0,
            revealed: HashSet::new(),
            status: AnswerStatus::Unanswered,
        }
    }

    pub fn mode(&self) -> &StudyMode {
        &self.mode
    }

    pub fn phase(&self) -> Phase {
        if self.position < self.deck.len() {
            Phase::InProgress
        } else {
            Phase::Completed
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn status(&self) -> AnswerStatus {
        self.status
    }

    pub fn revealed(&self) -> &HashSet<usize> {
        &self.revealed
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.position)
    }

    /// Check a typed answer against the current card. The comparison is
    /// case-insensitive and ignores surrounding whitespace. Returns the new
    /// status, or None if no submission was expected.
    pub fn submit(&mut self, input: &str) -> Option<AnswerStatus> {
        if self.phase() != Phase::InProgress || self.status != AnswerStatus::Unanswered {
            return None;
        }
        let card = self.deck.get(self.position)?;
        let expected = card.answer.trim().to_lowercase();
        let given = input.trim().to_lowercase();
        self.status = if given == expected {
            self.score += 1;
            AnswerStatus::Correct
        } else {
            AnswerStatus::Wrong
        };
        Some(self.status)
    }

    /// Reveal one more randomly chosen letter of the current answer. Space
    /// positions are never revealed and no index is revealed twice. Not
    /// valid once the card has been answered correctly.
    pub fn reveal_hint(&mut self) -> HintOutcome {
        if self.phase() != Phase::InProgress || self.status == AnswerStatus::Correct {
            return HintOutcome::NotAllowed;
        }
        let Some(card) = self.deck.get(self.position) else {
            return HintOutcome::NotAllowed;
        };
        let hidden: Vec<usize> = card
            .answer
            .chars()
            .enumerate()
            .filter(|(index, c)| *c != ' ' && !self.revealed.contains(index))
            .map(|(index, _)| index)
            .collect();
        match hidden.choose(&mut thread_rng()) {
            Some(&index) => {
                self.revealed.insert(index);
                HintOutcome::Revealed(index)
            }
            None => HintOutcome::Exhausted,
        }
    }

    /// Move to the next card. Valid only once the current card has been
    /// answered; resets the revealed set and the answer status. Returns
    /// whether the position advanced.
    pub fn advance(&mut self) -> bool {
        if self.phase() != Phase::InProgress || self.status == AnswerStatus::Unanswered {
            return false;
        }
        self.position += 1;
        self.revealed.clear();
        self.status = AnswerStatus::Unanswered;
        true
    }

    /// Clear a wrong answer for another attempt. The position and the
    /// revealed hint positions are kept.
    pub fn retry(&mut self) -> bool {
        if self.status != AnswerStatus::Wrong {
            return false;
        }
        self.status = AnswerStatus::Unanswered;
        true
    }

    /// Shuffle the same deck again and start over. Valid only once the
    /// deck has been completed.
    pub fn restart(&mut self) -> bool {
        if self.phase() != Phase::Completed {
            return false;
        }
        self.deck.reshuffle();
        self.position = 0;
        self.score = 0;
        self.revealed.clear();
        self.status = AnswerStatus::Unanswered;
        true
    }

    /// The current answer with unrevealed letters masked. Spaces are shown
    /// as-is.
    pub fn masked_answer(&self) -> Option<String> {
        let card = self.deck.get(self.position)?;
        let masked = card
            .answer
            .chars()
            .enumerate()
            .map(|(index, c)| {
                if c == ' ' || self.revealed.contains(&index) {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Some(masked)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::mode::Part;

    use super::*;

    fn learn_mode() -> StudyMode {
        StudyMode::Learn {
            unit: "U1".to_string(),
            part: Part::One,
        }
    }

    fn one_card_session(answer: &str) -> Session {
        let deck = Deck::shuffled(vec![Card::new("q", answer, "U1")]);
        Session::start(learn_mode(), deck)
    }

    #[test]
    fn test_start_state() {
        let session = one_card_session("four");
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.status(), AnswerStatus::Unanswered);
        assert!(session.revealed().is_empty());
    }

    #[test]
    fn test_empty_deck_is_born_completed() {
        let session = Session::start(learn_mode(), Deck::shuffled(Vec::new()));
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn test_submit_is_case_and_trim_insensitive() {
        let mut session = one_card_session("paris");
        assert_eq!(session.submit(" Paris "), Some(AnswerStatus::Correct));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_submit_wrong() {
        let mut session = one_card_session("four");
        assert_eq!(session.submit("five"), Some(AnswerStatus::Wrong));
        assert_eq!(session.score(), 0);
        // A second submission without a retry is ignored.
        assert_eq!(session.submit("four"), None);
    }

    #[test]
    fn test_retry_then_resubmit() {
        let mut session = one_card_session("four");
        session.submit("five");
        assert!(session.retry());
        assert_eq!(session.status(), AnswerStatus::Unanswered);
        assert_eq!(session.position(), 0);
        assert_eq!(session.submit("FOUR"), Some(AnswerStatus::Correct));
    }

    #[test]
    fn test_retry_requires_wrong_answer() {
        let mut session = one_card_session("four");
        assert!(!session.retry());
        session.submit("four");
        assert!(!session.retry());
    }

    #[test]
    fn test_advance_requires_an_answer() {
        let mut session = one_card_session("four");
        assert!(!session.advance());
        session.submit("four");
        assert!(session.advance());
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn test_advance_resets_status_and_revealed() {
        let deck = Deck::shuffled(vec![
            Card::new("q1", "four", "U1"),
            Card::new("q2", "five", "U1"),
        ]);
        let mut session = Session::start(learn_mode(), deck);
        session.reveal_hint();
        session.submit("wrong");
        assert!(session.advance());
        assert_eq!(session.status(), AnswerStatus::Unanswered);
        assert!(session.revealed().is_empty());
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_hint_reveals_every_letter_exactly_once() {
        let mut session = one_card_session("new york");
        let letters = "new york".chars().filter(|c| *c != ' ').count();
        let mut seen = HashSet::new();
        for _ in 0..letters {
            match session.reveal_hint() {
                HintOutcome::Revealed(index) => {
                    assert!(seen.insert(index), "index {index} revealed twice");
                    // Index 3 is the space.
                    assert_ne!(index, 3);
                }
                outcome => panic!("unexpected outcome: {outcome:?}"),
            }
        }
        assert_eq!(session.reveal_hint(), HintOutcome::Exhausted);
        assert_eq!(session.masked_answer().unwrap(), "new york");
    }

    #[test]
    fn test_hint_not_allowed_after_correct_answer() {
        let mut session = one_card_session("four");
        session.submit("four");
        assert_eq!(session.reveal_hint(), HintOutcome::NotAllowed);
    }

    #[test]
    fn test_hint_allowed_after_wrong_answer() {
        let mut session = one_card_session("four");
        session.submit("five");
        assert!(matches!(session.reveal_hint(), HintOutcome::Revealed(_)));
    }

    #[test]
    fn test_retry_keeps_revealed_positions() {
        let mut session = one_card_session("four");
        session.reveal_hint();
        session.submit("five");
        session.retry();
        assert_eq!(session.revealed().len(), 1);
    }

    #[test]
    fn test_masked_answer() {
        let mut session = one_card_session("ab c");
        assert_eq!(session.masked_answer().unwrap(), "__ _");
        while session.revealed().len() < 3 {
            session.reveal_hint();
        }
        assert_eq!(session.masked_answer().unwrap(), "ab c");
    }

    #[test]
    fn test_restart_reshuffles_and_resets() {
        let deck = Deck::shuffled(vec![
            Card::new("q1", "a1", "U1"),
            Card::new("q2", "a2", "U1"),
        ]);
        let mut session = Session::start(learn_mode(), deck);
        // Restart is invalid mid-session.
        assert!(!session.restart());
        session.submit("a-wrong-answer");
        session.advance();
        session.submit("another-wrong-answer");
        session.advance();
        assert_eq!(session.phase(), Phase::Completed);
        assert!(session.restart());
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.status(), AnswerStatus::Unanswered);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_walkthrough_correct_completion() {
        let deck = Deck::shuffled(vec![Card::new("2+2?", "four", "U1")]);
        let mut session = Session::start(learn_mode(), deck);
        assert_eq!(session.submit("FOUR"), Some(AnswerStatus::Correct));
        assert_eq!(session.score(), 1);
        assert!(session.advance());
        assert_eq!(session.position(), 1);
        assert_eq!(session.phase(), Phase::Completed);
    }
}
