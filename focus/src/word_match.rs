//! Fuzzy matching of an input's value against a word list.
//!
//! [`WordMatch`] listens to key presses on an existing input. Half a second
//! after the last one it ranks the words against the input's value and
//! dispatches a `matchingComplete` event at the input, carrying the
//! accepted words best first.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use focusdom::{Detail, Event, EventType, NodeId};

use crate::listener::Listener;
use crate::runtime::scheduler::TimerId;
use crate::runtime::Runtime;

/// Delay between the last key press and the match.
pub const DEBOUNCE: Duration = Duration::from_millis(500);
/// Name of the event dispatched with the matching words.
pub const MATCHING_COMPLETE: &str = "matchingComplete";

/// Reference length the weights are normalised against at most. Past it
/// the penalty for extra letters would no longer be representable.
const MAX_WEIGHTED_LEN: usize = 512;

/// Likeness of `word` to `reference`, in `[0, 1]` for words no longer
/// than the reference and possibly negative past it.
///
/// A case-insensitive substring scores 1. Otherwise each position where
/// both words have the same letter adds a weight halving from the first
/// letter on, and each letter past the end of the reference subtracts a
/// weight doubling from 1. The sum is divided by the total weight of the
/// reference.
///
/// Weights are scaled by `2^-len` before summing, with `len` capped at
/// [`MAX_WEIGHTED_LEN`], so long references keep finite, distinct scores.
pub fn match_rate(reference: &str, word: &str) -> f64 {
    if reference.to_uppercase().contains(&word.to_uppercase()) {
        return 1.0;
    }
    let reference: Vec<char> = reference.chars().collect();
    let len = reference.len();
    if len == 0 {
        return 0.0;
    }
    let scale = len.min(MAX_WEIGHTED_LEN) as i32;
    let total = 1.0 - 2f64.powi(-scale);

    let mut rate = 0.0;
    for (i, c) in word.chars().enumerate() {
        if i < len {
            if same_letter(reference[i], c) {
                rate += 2f64.powi(-1 - i as i32);
            }
        } else {
            rate -= 2f64.powi((i - len) as i32 - scale);
        }
    }
    rate / total
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_uppercase().eq(b.to_uppercase())
}

/// Score a word must exceed to be accepted for an input of `len` letters.
pub fn acceptance_threshold(len: usize) -> f64 {
    match len {
        0 | 1 => 0.0,
        2 => 0.50,
        3 => 0.75,
        4 => 0.85,
        5 => 0.90,
        6 => 0.95,
        _ => 0.99,
    }
}

/// Words scoring above the threshold for `input`, best first. Words with
/// the same score keep their order.
pub fn matching_words(words: &[String], input: &str) -> Vec<String> {
    let threshold = acceptance_threshold(input.chars().count());
    let mut rated: Vec<(&String, f64)> = words
        .iter()
        .map(|word| (word, match_rate(word, input)))
        .collect();
    rated.sort_by(|a, b| b.1.total_cmp(&a.1));
    rated
        .into_iter()
        .filter(|&(_, rate)| rate > threshold)
        .map(|(word, _)| word.clone())
        .collect()
}

#[derive(Debug, Default)]
struct State {
    words: Vec<String>,
    sorted: Vec<String>,
    pending: Option<TimerId>,
}

/// Debounced matcher attached to an input element.
#[derive(Debug, Clone)]
pub struct WordMatch {
    input: NodeId,
    state: Rc<RefCell<State>>,
}

impl WordMatch {
    pub fn new(rt: &mut Runtime, input: NodeId, words: Vec<String>) -> Self {
        let state = Rc::new(RefCell::new(State {
            words,
            ..State::default()
        }));

        let handler_state = Rc::clone(&state);
        rt.bind(
            input,
            [Listener::new(EventType::KeyDown, move |rt: &mut Runtime, _: &Event| {
                arm(rt, input, &handler_state)
            })],
        );
        Self { input, state }
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Result of the last completed match.
    pub fn sorted_words(&self) -> Vec<String> {
        self.state.borrow().sorted.clone()
    }

    pub fn words(&self) -> Vec<String> {
        self.state.borrow().words.clone()
    }

    /// Replace the word list. Takes effect at the next match.
    pub fn set_words(&self, words: Vec<String>) {
        self.state.borrow_mut().words = words;
    }

    /// Whether a match is waiting for the debounce delay.
    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }
}

/// Restart the debounce timer.
fn arm(rt: &mut Runtime, input: NodeId, state: &Rc<RefCell<State>>) {
    if let Some(previous) = state.borrow_mut().pending.take() {
        rt.clear_timer(previous);
    }
    let timer_state = Rc::clone(state);
    let timer = rt.set_timeout(DEBOUNCE, move |rt| complete(rt, input, &timer_state));
    state.borrow_mut().pending = Some(timer);
}

fn complete(rt: &mut Runtime, input: NodeId, state: &Rc<RefCell<State>>) {
    let value = rt.document().value(input).to_string();
    let sorted = {
        let mut state = state.borrow_mut();
        state.pending = None;
        state.sorted = if value.is_empty() {
            state.words.clone()
        } else {
            matching_words(&state.words, &value)
        };
        state.sorted.clone()
    };
    log::debug!("word match {value:?}: {} word(s)", sorted.len());
    rt.dispatch(
        Event::new(EventType::Custom(MATCHING_COMPLETE.to_string()), input)
            .detail(Detail::Words(sorted)),
    );
}
