use crate::libeslestirme::sayac::Elapsed;
use crate::libeslestirme::soru::{Matching, MatchingQuestion};
use log::{debug, warn};
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

pub const POINTS_PER_CORRECT: u32 = 5;
pub const WRONGS_PER_CANCEL: u32 = 3;
pub const SCORING_RULE: &str = "Doğrular 5 puan ve 3 yanlış 1 doğruyu götürüyor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Submitted,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub correct: u32,
    pub incorrect: u32,
    pub empty: u32,
    pub total_points: u32,
}

pub fn drop_zone_id(prompt_index: usize) -> String {
    format!("drop-{prompt_index}")
}

fn zone_index(zone_id: &str) -> Option<usize> {
    zone_id.split('-').nth(1)?.parse().ok()
}

/// Tallies one answer map against one sub-question. A stored value that does
/// not parse back to an index counts as incorrect, never as a failure.
pub fn score(question: &MatchingQuestion, answers: &HashMap<String, String>) -> Summary {
    let mut correct: u32 = 0;
    let mut incorrect = 0;
    let mut empty = 0;
    for index in 0..question.question.len() {
        match answers.get(&drop_zone_id(index)) {
            Some(value) => match value.parse::<usize>() {
                Ok(answer) if answer == index => correct += 1,
                _ => incorrect += 1,
            },
            None => empty += 1,
        }
    }
    let canceled = incorrect / WRONGS_PER_CANCEL;
    let effective = correct.saturating_sub(canceled);
    Summary {
        correct,
        incorrect,
        empty,
        total_points: effective * POINTS_PER_CORRECT,
    }
}

#[derive(Debug)]
pub struct Session {
    matching: Matching,
    current: usize,
    answers: HashMap<String, String>,
    chip_order: Vec<usize>,
    phase: Phase,
    elapsed: Elapsed,
    summary: Option<Summary>,
}

impl Session {
    pub fn new(matching: Matching) -> Session {
        let mut session = Session {
            matching,
            current: 0,
            answers: HashMap::new(),
            chip_order: Vec::new(),
            phase: Phase::Active,
            elapsed: Elapsed::default(),
            summary: None,
        };
        session.enter_question();
        session
    }

    fn enter_question(&mut self) {
        self.answers.clear();
        let chips = self
            .current_question()
            .map_or(0, |question| question.correct_answer.len());
        self.chip_order = (0..chips).collect();
        self.chip_order.shuffle(&mut rng());
        debug!(
            "[Session] Entered question {}/{} with {} answers.",
            self.current + 1,
            self.question_count(),
            chips
        );
    }

    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> Elapsed {
        self.elapsed
    }

    pub fn summary(&self) -> Option<Summary> {
        self.summary
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.matching.questions.len()
    }

    pub fn current_question(&self) -> Option<&MatchingQuestion> {
        self.matching.questions.get(self.current)
    }

    /// Presentation order of the answer chips, reshuffled per sub-question.
    pub fn chip_order(&self) -> &[usize] {
        &self.chip_order
    }

    pub fn tick(&mut self) {
        if self.phase == Phase::Active {
            self.elapsed.tick();
        }
    }

    /// An answer already placed somewhere is no longer draggable.
    pub fn is_consumed(&self, answer_index: usize) -> bool {
        let id = answer_index.to_string();
        self.answers.values().any(|value| *value == id)
    }

    /// Answer text assigned to a prompt slot, with whether it belongs there.
    pub fn placed_answer(&self, prompt_index: usize) -> Option<(&str, bool)> {
        let value = self.answers.get(&drop_zone_id(prompt_index))?;
        let answer_index = value.parse::<usize>().ok()?;
        let text = self.current_question()?.correct_answer.get(answer_index)?;
        Some((text.as_str(), answer_index == prompt_index))
    }

    /// A completed drag. No target means the chip was released outside every
    /// drop zone and nothing happens.
    pub fn drag_ended(&mut self, item_id: &str, target: Option<&str>) -> Option<DropOutcome> {
        let target = target?;
        if self.phase != Phase::Active {
            warn!("[Session] Ignoring a drop outside the active phase.");
            return None;
        }
        self.answers.insert(target.to_string(), item_id.to_string());
        let outcome = match (item_id.parse::<usize>(), zone_index(target)) {
            (Ok(answer), Some(prompt)) if answer == prompt => DropOutcome::Correct,
            _ => DropOutcome::Incorrect,
        };
        debug!("[Session] {} -> {}: {:?}", item_id, target, outcome);
        Some(outcome)
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.question_count() {
            self.current += 1;
            self.enter_question();
        }
    }

    pub fn previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
            self.enter_question();
        }
    }

    pub fn jump(&mut self, index: usize) {
        if index < self.question_count() && index != self.current {
            self.current = index;
            self.enter_question();
        }
    }

    pub fn on_last_question(&self) -> bool {
        self.current + 1 >= self.question_count()
    }

    /// The forward button: advance, or submit when already on the last
    /// sub-question.
    pub fn advance_or_submit(&mut self) -> Option<Summary> {
        if self.on_last_question() {
            Some(self.submit())
        } else {
            self.next();
            None
        }
    }

    /// Freezes the timer and tallies the currently displayed sub-question.
    pub fn submit(&mut self) -> Summary {
        self.phase = Phase::Submitted;
        let summary = self
            .current_question()
            .map_or(Summary::default(), |question| {
                score(question, &self.answers)
            });
        self.summary = Some(summary);
        debug!("[Session] Submitted: {:?}", summary);
        summary
    }

    pub fn exit(&mut self) {
        self.elapsed.reset();
        self.summary = None;
        self.phase = Phase::Exited;
        debug!("[Session] Exited.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching(questions: Vec<MatchingQuestion>) -> Matching {
        Matching {
            id: "m-1".to_string(),
            title: "Deneme".to_string(),
            questions,
        }
    }

    fn abc_question() -> MatchingQuestion {
        MatchingQuestion {
            title: "Eşleştir".to_string(),
            question: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            correct_answer: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }

    fn abc_session() -> Session {
        Session::new(matching(vec![abc_question()]))
    }

    fn place(session: &mut Session, answer: usize, prompt: usize) -> Option<DropOutcome> {
        session.drag_ended(&answer.to_string(), Some(&drop_zone_id(prompt)))
    }

    #[test]
    fn counts_always_cover_every_prompt() {
        let mut session = abc_session();
        place(&mut session, 1, 0);
        let summary = session.submit();
        assert_eq!(
            summary.correct + summary.incorrect + summary.empty,
            3,
            "every prompt is correct, incorrect or empty"
        );
    }

    #[test]
    fn swapped_pair_scores_zero_points() {
        let mut session = abc_session();
        assert_eq!(place(&mut session, 1, 0), Some(DropOutcome::Incorrect));
        assert_eq!(place(&mut session, 0, 1), Some(DropOutcome::Incorrect));
        let summary = session.submit();
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.total_points, 0);
    }

    #[test]
    fn all_correct_scores_fifteen() {
        let mut session = abc_session();
        for index in 0..3 {
            assert_eq!(place(&mut session, index, index), Some(DropOutcome::Correct));
        }
        let summary = session.submit();
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.incorrect, 0);
        assert_eq!(summary.empty, 0);
        assert_eq!(summary.total_points, 15);
    }

    #[test]
    fn three_wrongs_cancel_one_right() {
        let question = MatchingQuestion {
            title: "Yedi hedef".to_string(),
            question: (0..7).map(|i| format!("soru {i}")).collect(),
            correct_answer: (0..7).map(|i| format!("cevap {i}")).collect(),
        };
        let mut session = Session::new(matching(vec![question]));
        for index in 0..4 {
            place(&mut session, index, index);
        }
        // three deliberate mismatches on the remaining prompts
        place(&mut session, 5, 4);
        place(&mut session, 6, 5);
        place(&mut session, 4, 6);
        let summary = session.submit();
        assert_eq!(summary.correct, 4);
        assert_eq!(summary.incorrect, 3);
        assert_eq!(summary.total_points, 15);
    }

    #[test]
    fn points_never_go_negative() {
        let question = MatchingQuestion {
            title: "Altı hedef".to_string(),
            question: (0..6).map(|i| format!("soru {i}")).collect(),
            correct_answer: (0..6).map(|i| format!("cevap {i}")).collect(),
        };
        let mut session = Session::new(matching(vec![question]));
        for prompt in 0..6 {
            place(&mut session, (prompt + 1) % 6, prompt);
        }
        let summary = session.submit();
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.incorrect, 6);
        assert_eq!(summary.total_points, 0);
    }

    #[test]
    fn redropping_same_chip_on_same_slot_is_idempotent() {
        let mut session = abc_session();
        place(&mut session, 2, 0);
        let first = session.submit();
        let mut again = abc_session();
        place(&mut again, 2, 0);
        place(&mut again, 2, 0);
        let second = again.submit();
        assert_eq!(first, second);
    }

    #[test]
    fn placed_chip_is_consumed_until_replaced() {
        let mut session = abc_session();
        place(&mut session, 2, 0);
        assert!(session.is_consumed(2));
        assert!(!session.is_consumed(0));
        // another chip lands on the same slot and frees the first one
        place(&mut session, 0, 0);
        assert!(!session.is_consumed(2));
        assert!(session.is_consumed(0));
    }

    #[test]
    fn drop_outside_any_zone_changes_nothing() {
        let mut session = abc_session();
        assert_eq!(session.drag_ended("1", None), None);
        let summary = session.submit();
        assert_eq!(summary.empty, 3);
    }

    #[test]
    fn unparsable_chip_id_scores_incorrect() {
        let mut session = abc_session();
        assert_eq!(
            session.drag_ended("bozuk", Some(&drop_zone_id(0))),
            Some(DropOutcome::Incorrect)
        );
        let summary = session.submit();
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.empty, 2);
    }

    #[test]
    fn unparsable_zone_id_never_reaches_the_tally() {
        let mut session = abc_session();
        assert_eq!(
            session.drag_ended("1", Some("drop-bozuk")),
            Some(DropOutcome::Incorrect)
        );
        let summary = session.submit();
        assert_eq!(summary.empty, 3);
    }

    #[test]
    fn placed_answer_reports_text_and_fit() {
        let mut session = abc_session();
        place(&mut session, 1, 1);
        place(&mut session, 0, 2);
        assert_eq!(session.placed_answer(1), Some(("b", true)));
        assert_eq!(session.placed_answer(2), Some(("a", false)));
        assert_eq!(session.placed_answer(0), None);
    }

    fn two_question_session() -> Session {
        Session::new(matching(vec![abc_question(), abc_question()]))
    }

    #[test]
    fn answers_reset_when_question_changes() {
        let mut session = two_question_session();
        place(&mut session, 0, 0);
        session.next();
        assert_eq!(session.placed_answer(0), None);
        place(&mut session, 1, 1);
        session.previous();
        assert_eq!(session.placed_answer(1), None);
    }

    #[test]
    fn jump_to_current_question_keeps_answers() {
        let mut session = two_question_session();
        place(&mut session, 0, 0);
        session.jump(0);
        assert_eq!(session.placed_answer(0), Some(("a", true)));
        session.jump(1);
        assert_eq!(session.placed_answer(0), None);
    }

    #[test]
    fn submit_scores_only_the_displayed_question() {
        let mut session = two_question_session();
        for index in 0..3 {
            place(&mut session, index, index);
        }
        session.next();
        let summary = session.submit();
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.empty, 3);
    }

    #[test]
    fn advance_or_submit_submits_on_the_last_question() {
        let mut session = two_question_session();
        assert!(session.advance_or_submit().is_none());
        assert_eq!(session.phase(), Phase::Active);
        assert!(session.advance_or_submit().is_some());
        assert_eq!(session.phase(), Phase::Submitted);
    }

    #[test]
    fn ticks_count_only_while_active() {
        let mut session = abc_session();
        for _ in 0..5 {
            session.tick();
        }
        session.submit();
        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.elapsed().seconds, 5);
    }

    #[test]
    fn drops_after_submission_are_ignored() {
        let mut session = abc_session();
        session.submit();
        assert_eq!(place(&mut session, 0, 0), None);
        assert_eq!(session.placed_answer(0), None);
    }

    #[test]
    fn exit_resets_the_timer_and_hides_results() {
        let mut session = abc_session();
        session.tick();
        session.submit();
        assert!(session.summary().is_some());
        session.exit();
        assert_eq!(session.phase(), Phase::Exited);
        assert_eq!(session.elapsed(), Elapsed::default());
        assert!(session.summary().is_none());
    }

    #[test]
    fn chip_order_is_a_permutation_of_answers() {
        let session = abc_session();
        let mut order = session.chip_order().to_vec();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
