use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::content::bundled;
use crate::lesson::engine::{LessonCompletion, LessonEngine, Status, Step};
use crate::lesson::input::AnswerInput;
use crate::lesson::mistakes::MistakeRecord;
use crate::lesson::plan::{LessonPlan, PlanError};
use crate::store::json_store::JsonStore;
use crate::store::schema::{
    LessonHistoryData, LessonResult, MistakeBookData, ProfileData, SCHEMA_VERSION,
};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Lesson,
    LessonResult,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub store: Option<JsonStore>,
    pub profile: ProfileData,
    pub mistake_book: MistakeBookData,
    pub history: Vec<LessonResult>,
    pub engine: Option<LessonEngine>,
    pub answer: AnswerInput,
    pub paused: bool,
    pub last_result: Option<LessonResult>,
    pub last_mistakes: Vec<MistakeRecord>,
    pub notice: Option<String>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "local store unavailable, progress will not be saved");
                None
            }
        };
        Self::with_store(config, theme, store)
    }

    pub fn with_store(config: Config, theme: &'static Theme, store: Option<JsonStore>) -> Self {
        let (profile, mistake_book, history) = match &store {
            Some(s) => match s.load_profile() {
                Some(pd) if !pd.needs_reset() => {
                    (pd, s.load_mistake_book(), s.load_history().lessons)
                }
                _ => {
                    tracing::warn!("profile unreadable or outdated, starting fresh");
                    (ProfileData::default(), MistakeBookData::default(), Vec::new())
                }
            },
            None => (ProfileData::default(), MistakeBookData::default(), Vec::new()),
        };

        let mut menu = Menu::new(theme, bundled::available_lessons());
        menu.set_review_count(mistake_book.mistakes.len());

        Self {
            screen: AppScreen::Menu,
            config,
            theme,
            menu,
            store,
            profile,
            mistake_book,
            history,
            engine: None,
            answer: AnswerInput::Passive,
            paused: false,
            last_result: None,
            last_mistakes: Vec::new(),
            notice: None,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn start_lesson(
        &mut self,
        plan: LessonPlan,
        node_index: usize,
        review_mode: bool,
    ) -> Result<(), PlanError> {
        self.engine = Some(LessonEngine::new(plan, node_index, review_mode)?);
        self.paused = false;
        self.notice = None;
        self.reset_answer();
        self.screen = AppScreen::Lesson;
        Ok(())
    }

    pub fn start_bundled(&mut self, name: &str, node_index: usize) -> Result<()> {
        let plan = bundled::load_bundled(name)?;
        self.start_lesson(plan, node_index, false)?;
        Ok(())
    }

    /// Replay stored mistakes as a review lesson. Review runs never splice a
    /// second retry pass.
    pub fn start_review(&mut self) -> Result<()> {
        if self.mistake_book.mistakes.is_empty() {
            bail!("No mistakes to review yet");
        }
        let plan = LessonPlan::from_mistakes(&self.mistake_book.mistakes);
        self.start_lesson(plan, 0, true)?;
        Ok(())
    }

    pub fn start_menu_selection(&mut self) {
        let result = match self.menu.selected_lesson() {
            Some(name) => {
                let name = name.to_string();
                let node_index = self.menu.selected;
                self.start_bundled(&name, node_index)
            }
            None => self.start_review(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not start lesson");
            self.notice = Some(e.to_string());
        }
    }

    fn reset_answer(&mut self) {
        self.answer = match &self.engine {
            Some(engine) => AnswerInput::for_widget(
                engine.current_screen().checkable_widget(),
                self.config.shuffle_puzzles,
                &mut self.rng,
            ),
            None => AnswerInput::Passive,
        };
    }

    pub fn status(&self) -> Option<Status> {
        self.engine.as_ref().map(|e| e.status())
    }

    /// Submit the current answer. Ignored until the input is complete.
    pub fn check(&mut self) {
        if !self.answer.is_ready() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.submit(&self.answer.to_answer_state());
        }
    }

    pub fn advance(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match engine.next_screen() {
            Step::Advanced(_) => self.reset_answer(),
            Step::ReviewStarted { retries, .. } => {
                self.notice = Some(format!("Let's fix {retries} mistake(s) before we finish"));
                self.reset_answer();
            }
            Step::Completed(completion) => self.finish_lesson(completion),
            Step::Finished => {}
        }
    }

    /// Enter key: check the answer, or continue once feedback is showing.
    /// Screens with nothing to answer are checked and left in one step.
    pub fn confirm(&mut self) {
        match self.status() {
            Some(Status::Idle) => {
                self.notice = None;
                if self.answer == AnswerInput::Passive {
                    self.advance();
                } else {
                    self.check();
                }
            }
            Some(Status::Correct | Status::Wrong) => self.advance(),
            None => {}
        }
    }

    pub fn retry(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.retry_current();
        }
        self.reset_answer();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        let paused = self.paused;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_timer_active(!paused);
        }
    }

    /// Leave the lesson without saving anything.
    pub fn abandon(&mut self) {
        if let Some(engine) = self.engine.take() {
            tracing::info!(title = engine.title(), "lesson abandoned");
        }
        self.answer = AnswerInput::Passive;
        self.go_to_menu();
    }

    fn finish_lesson(&mut self, completion: LessonCompletion) {
        let Some(engine) = self.engine.take() else {
            return;
        };
        let review = engine.is_review_mode();
        let result = LessonResult::from_completion(
            engine.title(),
            engine.node_index(),
            review,
            &completion,
        );

        if completion.should_save {
            self.profile
                .record_lesson(&completion.stats, chrono::Local::now().date_naive());
            if review {
                self.mistake_book.settle_review(&completion.mistakes);
            } else {
                self.mistake_book.merge(&completion.mistakes);
            }
            self.history.push(result.clone());
            if self.history.len() > self.config.history_limit {
                let excess = self.history.len() - self.config.history_limit;
                self.history.drain(..excess);
            }
            self.save_data();
        }

        self.menu.set_review_count(self.mistake_book.mistakes.len());
        self.last_result = Some(result);
        self.last_mistakes = completion.mistakes;
        self.answer = AnswerInput::Passive;
        self.screen = AppScreen::LessonResult;
    }

    fn save_data(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let saved = store
            .save_profile(&self.profile)
            .and_then(|_| store.save_mistake_book(&self.mistake_book))
            .and_then(|_| {
                store.save_history(&LessonHistoryData {
                    schema_version: SCHEMA_VERSION,
                    lessons: self.history.clone(),
                })
            });
        if let Err(e) = saved {
            tracing::error!(error = %e, "failed to save progress");
        }
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.paused = false;
    }
}
