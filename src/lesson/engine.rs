use serde::{Deserialize, Serialize};

use crate::lesson::mistakes::{MistakeManager, MistakeRecord};
use crate::lesson::plan::{LessonPlan, LessonScreen, PlanError};
use crate::lesson::timer::Timer;
use crate::lesson::validator::{self, AnswerState};

pub const XP_PER_CORRECT: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub xp: u32,
    pub streak: u32,
    pub elapsed_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LessonCompletion {
    pub stats: SessionStats,
    pub should_save: bool,
    pub mistakes: Vec<MistakeRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Cursor moved to the next planned (or already spliced) screen.
    Advanced(usize),
    /// Retry screens were appended; cursor is on the first of them.
    ReviewStarted { index: usize, retries: usize },
    /// The lesson ended. Returned once per engine.
    Completed(LessonCompletion),
    /// The lesson had already ended; nothing changed.
    Finished,
}

/// Drives one attempt at a lesson plan.
#[derive(Debug)]
pub struct LessonEngine {
    title: String,
    screens: Vec<LessonScreen>,
    current_index: usize,
    status: Status,
    streak: u32,
    xp_gained: u32,
    node_index: usize,
    review_mode: bool,
    mistakes: MistakeManager,
    timer: Timer,
    completed: bool,
}

impl LessonEngine {
    pub fn new(plan: LessonPlan, node_index: usize, review_mode: bool) -> Result<Self, PlanError> {
        Self::with_timer(plan, node_index, review_mode, Timer::new())
    }

    pub fn with_timer(
        plan: LessonPlan,
        node_index: usize,
        review_mode: bool,
        mut timer: Timer,
    ) -> Result<Self, PlanError> {
        plan.validate()?;
        timer.set_active(true);
        tracing::info!(
            title = %plan.title,
            screens = plan.screens.len(),
            node_index,
            review_mode,
            "lesson started"
        );
        Ok(Self {
            title: plan.title,
            screens: plan.screens,
            current_index: 0,
            status: Status::Idle,
            streak: 0,
            xp_gained: 0,
            node_index,
            review_mode,
            mistakes: MistakeManager::new(),
            timer,
            completed: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn screens(&self) -> &[LessonScreen] {
        &self.screens
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_screen(&self) -> &LessonScreen {
        &self.screens[self.current_index]
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn xp_gained(&self) -> u32 {
        self.xp_gained
    }

    pub fn node_index(&self) -> usize {
        self.node_index
    }

    pub fn is_review_mode(&self) -> bool {
        self.review_mode
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn mistakes(&self) -> &MistakeManager {
        &self.mistakes
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Pause or resume the lesson clock, e.g. while an overlay is open.
    pub fn set_timer_active(&mut self, active: bool) {
        if !self.completed {
            self.timer.set_active(active);
        }
    }

    pub fn progress(&self) -> f64 {
        (self.current_index + 1) as f64 / self.screens.len() as f64
    }

    /// Validate `answer` against the current screen's checkable widget and
    /// apply the verdict. A screen with nothing to check is left unscored;
    /// the caller just moves on with `next_screen`.
    pub fn submit(&mut self, answer: &AnswerState) -> Status {
        let Some(widget) = self.current_screen().checkable_widget() else {
            return self.status;
        };
        let correct = validator::validate(widget, answer);
        self.check_answer(correct)
    }

    pub fn check_answer(&mut self, is_correct: bool) -> Status {
        if self.completed || self.status != Status::Idle {
            return self.status;
        }

        if is_correct {
            self.streak += 1;
            self.xp_gained += XP_PER_CORRECT;
            self.status = Status::Correct;
        } else {
            self.streak = 0;
            self.status = Status::Wrong;
            let screen = &self.screens[self.current_index];
            self.mistakes
                .record_mistake(screen, &self.title, self.node_index);
        }
        self.status
    }

    pub fn retry_current(&mut self) {
        if self.status == Status::Wrong {
            self.status = Status::Idle;
        }
    }

    pub fn next_screen(&mut self) -> Step {
        if self.completed {
            return Step::Finished;
        }
        self.status = Status::Idle;

        if self.current_index + 1 < self.screens.len() {
            self.current_index += 1;
            return Step::Advanced(self.current_index);
        }

        let pending = !self.mistakes.retry_queue().is_empty();
        if pending && !self.review_mode && !self.mistakes.is_in_mistake_loop() {
            self.mistakes.start_review_loop();
            let retries = self.mistakes.take_queue();
            let count = retries.len();
            self.screens.extend(retries);
            self.current_index += 1;
            tracing::info!(retries = count, "review loop started");
            return Step::ReviewStarted {
                index: self.current_index,
                retries: count,
            };
        }

        self.complete()
    }

    fn complete(&mut self) -> Step {
        self.completed = true;
        self.timer.set_active(false);
        let completion = LessonCompletion {
            stats: SessionStats {
                xp: self.xp_gained,
                streak: self.streak,
                elapsed_secs: self.timer.elapsed_secs(),
            },
            should_save: true,
            mistakes: self.mistakes.session_mistakes().to_vec(),
        };
        tracing::info!(
            xp = completion.stats.xp,
            streak = completion.stats.streak,
            mistakes = completion.mistakes.len(),
            "lesson completed"
        );
        Step::Completed(completion)
    }
}
