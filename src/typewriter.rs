//! Hero caption typewriter.
//!
//! Two-state machine (Typing, Deleting) over a [`PhraseList`], driven by one
//! owned [`Timer`]. Each fired step re-emits the caption:
//!
//! ```text
//! Typing   --tick, phrase incomplete--> Typing    (+type_delay)
//! Typing   --tick, phrase complete----> hold      (+hold, then BeginDeleting)
//! hold     --BeginDeleting------------> Deleting  (+delete_delay)
//! Deleting --tick, text non-empty-----> Deleting  (+delete_delay)
//! Deleting --tick, text empty---------> Typing    (loop_count += 1, +type_delay)
//! ```
//!
//! Due times chain from the previous due time, not from when the event loop
//! got around to polling, so a late poll catches up without drift.

use std::time::{Duration, Instant};

use crate::timer::Timer;
use crate::types::PhraseList;

/// Shortest delay the engine schedules. Zero delays would leave a step due
/// at its own due time forever.
pub const MIN_STEP: Duration = Duration::from_millis(1);

/// Delays between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Between typed characters.
    pub type_delay: Duration,
    /// Between deleted characters.
    pub delete_delay: Duration,
    /// Pause on a fully typed phrase before deleting starts.
    pub hold: Duration,
}

impl TypewriterTiming {
    /// Every delay raised to at least [`MIN_STEP`].
    pub fn clamped(self) -> Self {
        Self {
            type_delay: self.type_delay.max(MIN_STEP),
            delete_delay: self.delete_delay.max(MIN_STEP),
            hold: self.hold.max(MIN_STEP),
        }
    }
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_delay: Duration::from_millis(150),
            delete_delay: Duration::from_millis(75),
            hold: Duration::from_millis(1500),
        }
    }
}

/// Observable engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterState {
    /// Prefix of the active phrase currently shown.
    pub current_text: String,
    pub is_deleting: bool,
    /// Completed type/delete cycles; the active phrase is `loop_count mod N`.
    pub loop_count: u64,
    /// Delay used for the most recent tick.
    pub typing_speed: Duration,
}

/// One fired step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub at: Instant,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Tick,
    BeginDeleting,
}

#[derive(Debug)]
pub struct Typewriter {
    phrases: PhraseList,
    timing: TypewriterTiming,
    state: TypewriterState,
    /// Characters of the active phrase shown; mirrors `current_text`.
    shown: usize,
    timer: Timer<Step>,
}

impl Typewriter {
    pub fn new(phrases: PhraseList, timing: TypewriterTiming) -> Self {
        let timing = timing.clamped();
        Self {
            phrases,
            timing,
            state: Self::initial_state(&timing),
            shown: 0,
            timer: Timer::new(),
        }
    }

    fn initial_state(timing: &TypewriterTiming) -> TypewriterState {
        TypewriterState {
            current_text: String::new(),
            is_deleting: false,
            loop_count: 0,
            typing_speed: timing.type_delay,
        }
    }

    /// Reset to the initial state and schedule the first tick.
    pub fn start(&mut self, now: Instant) {
        self.timer.cancel();
        self.state = Self::initial_state(&self.timing);
        self.shown = 0;
        self.timer.schedule(now + self.timing.type_delay, Step::Tick);
    }

    /// Cancel any pending step. The caption freezes where it is.
    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn text(&self) -> &str {
        &self.state.current_text
    }

    pub fn state(&self) -> &TypewriterState {
        &self.state
    }

    pub fn active_phrase(&self) -> &str {
        self.phrases.cycled(self.state.loop_count)
    }

    /// Fire every step due at `now`. Returns true if anything fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        while let Some(scheduled) = self.timer.take_due(now) {
            self.fire(scheduled.kind, scheduled.due);
            fired = true;
        }
        fired
    }

    /// Fire the pending step at its own due time, whatever the clock says.
    ///
    /// Lets callers walk the animation on a virtual timeline.
    pub fn fire_next(&mut self) -> Option<Emission> {
        let scheduled = self.timer.take()?;
        self.fire(scheduled.kind, scheduled.due);
        Some(Emission {
            at: scheduled.due,
            text: self.state.current_text.clone(),
        })
    }

    fn fire(&mut self, step: Step, at: Instant) {
        match step {
            Step::BeginDeleting => {
                self.state.is_deleting = true;
                self.state.typing_speed = self.timing.delete_delay;
                self.timer.schedule(at + self.timing.delete_delay, Step::Tick);
            }
            Step::Tick if self.state.is_deleting => self.delete_one(at),
            Step::Tick => self.type_one(at),
        }
    }

    fn type_one(&mut self, at: Instant) {
        let total = self.active_phrase().chars().count();
        self.shown = (self.shown + 1).min(total);
        self.sync_text();
        self.state.typing_speed = self.timing.type_delay;

        if self.shown == total {
            self.timer.schedule(at + self.timing.hold, Step::BeginDeleting);
        } else {
            self.timer.schedule(at + self.timing.type_delay, Step::Tick);
        }
    }

    fn delete_one(&mut self, at: Instant) {
        self.shown = self.shown.saturating_sub(1);
        self.sync_text();
        self.state.typing_speed = self.timing.delete_delay;

        if self.shown == 0 {
            self.state.is_deleting = false;
            self.state.loop_count = self.state.loop_count.wrapping_add(1);
            self.state.typing_speed = self.timing.type_delay;
            // Next phrase starts at typing speed
            self.timer.schedule(at + self.timing.type_delay, Step::Tick);
        } else {
            self.timer.schedule(at + self.timing.delete_delay, Step::Tick);
        }
    }

    fn sync_text(&mut self) {
        let prefix: String = self.active_phrase().chars().take(self.shown).collect();
        self.state.current_text = prefix;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine(phrases: &[&str]) -> Typewriter {
        Typewriter::new(PhraseList::new(phrases.iter().copied()).unwrap(), TypewriterTiming::default())
    }

    #[test]
    fn initial_state_is_empty_typing() {
        let tw = engine(&["A"]);
        assert_eq!(tw.text(), "");
        assert!(!tw.state().is_deleting);
        assert_eq!(tw.state().loop_count, 0);
        assert!(!tw.is_running());
    }

    #[test]
    fn two_phrase_example_sequence() {
        let t0 = Instant::now();
        let mut tw = engine(&["A", "BC"]);
        tw.start(t0);

        let expected = [
            (150, "A"),   // typed phrase 0
            (1650, "A"),  // hold elapsed, deleting begins
            (1725, ""),   // deleted, loop advances
            (1875, "B"),  // typing phrase 1
            (2025, "BC"), // complete
            (3525, "BC"), // hold elapsed
            (3600, "B"),
            (3675, ""),
            (3825, "A"), // back to phrase 0
        ];
        for (offset, text) in expected {
            let emission = tw.fire_next().unwrap();
            assert_eq!(emission.at, t0 + ms(offset), "at {}", text);
            assert_eq!(emission.text, text);
        }
        assert_eq!(tw.state().loop_count, 2);
    }

    #[test]
    fn zero_timing_is_clamped_so_poll_returns() {
        let zero = TypewriterTiming {
            type_delay: Duration::ZERO,
            delete_delay: Duration::ZERO,
            hold: Duration::ZERO,
        };
        let t0 = Instant::now();
        let mut tw = Typewriter::new(PhraseList::new(["AB"]).unwrap(), zero);
        tw.start(t0);
        assert_eq!(tw.next_deadline(), Some(t0 + MIN_STEP));

        // Five steps are due by t0 + 5ms: A, AB, begin deleting, A, ""
        assert!(tw.poll(t0 + ms(5)));
        assert_eq!(tw.text(), "");
        assert_eq!(tw.state().loop_count, 1);
        assert_eq!(tw.next_deadline(), Some(t0 + ms(6)));
    }

    #[test]
    fn typing_speed_tracks_direction() {
        let t0 = Instant::now();
        let mut tw = engine(&["AB"]);
        tw.start(t0);
        tw.fire_next(); // "A"
        assert_eq!(tw.state().typing_speed, ms(150));
        tw.fire_next(); // "AB"
        tw.fire_next(); // begin deleting
        assert!(tw.state().is_deleting);
        assert_eq!(tw.state().typing_speed, ms(75));
    }

    #[test]
    fn loop_advances_modulo_for_three_rounds() {
        let phrases = ["Data Privacy Manager", "InfoSec", "GRC"];
        let n = phrases.len() as u64;
        let t0 = Instant::now();
        let mut tw = engine(&phrases);
        tw.start(t0);

        for cycle in 0..(3 * n) {
            let index = (cycle % n) as usize;
            assert_eq!(tw.active_phrase(), phrases[index]);
            assert_eq!(tw.state().loop_count, cycle);

            // Run until the loop counter moves, checking the prefix invariant
            // and that length never moves against the current direction.
            let mut previous_len = tw.text().chars().count();
            while tw.state().loop_count == cycle {
                let deleting_before = tw.state().is_deleting;
                let emission = tw.fire_next().unwrap();
                let len = emission.text.chars().count();

                if tw.state().loop_count == cycle {
                    assert!(phrases[index].starts_with(&emission.text));
                    assert!(len <= phrases[index].chars().count());
                    if deleting_before {
                        assert!(len <= previous_len);
                    } else {
                        assert!(len >= previous_len);
                    }
                }
                previous_len = len;
            }
            assert_eq!(tw.text(), "");
        }
    }

    #[test]
    fn poll_catches_up_without_drift() {
        let t0 = Instant::now();
        let mut tw = engine(&["ABC"]);
        tw.start(t0);

        // A single late poll fires all three typing ticks
        assert!(tw.poll(t0 + ms(460)));
        assert_eq!(tw.text(), "ABC");
        assert_eq!(tw.next_deadline(), Some(t0 + ms(450) + ms(1500)));
    }

    #[test]
    fn poll_before_deadline_fires_nothing() {
        let t0 = Instant::now();
        let mut tw = engine(&["ABC"]);
        tw.start(t0);
        assert!(!tw.poll(t0 + ms(149)));
        assert_eq!(tw.text(), "");
    }

    #[test]
    fn stop_cancels_pending_steps() {
        let t0 = Instant::now();
        let mut tw = engine(&["ABC"]);
        tw.start(t0);
        tw.poll(t0 + ms(150));
        tw.stop();

        assert!(!tw.is_running());
        assert!(!tw.poll(t0 + Duration::from_secs(3600)));
        assert_eq!(tw.fire_next(), None);
        assert_eq!(tw.text(), "A");
    }

    #[test]
    fn start_restarts_from_scratch() {
        let t0 = Instant::now();
        let mut tw = engine(&["AB", "CD"]);
        tw.start(t0);
        for _ in 0..6 {
            tw.fire_next();
        }
        assert_eq!(tw.state().loop_count, 1);

        let t1 = t0 + Duration::from_secs(10);
        tw.start(t1);
        assert_eq!(tw.text(), "");
        assert_eq!(tw.state().loop_count, 0);
        assert_eq!(tw.next_deadline(), Some(t1 + ms(150)));
    }

    #[test]
    fn multibyte_phrases_stay_on_char_boundaries() {
        let t0 = Instant::now();
        let mut tw = engine(&["héllo"]);
        tw.start(t0);
        let typed: Vec<String> = (0..5).map(|_| tw.fire_next().unwrap().text).collect();
        assert_eq!(typed, ["h", "hé", "hél", "héll", "héllo"]);
    }
}
