use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lesson::plan::{LessonScreen, Widget};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
    pub id: String,
    pub problem_name: String,
    pub node_index: usize,
    pub question_type: String,
    pub context: String,
    pub widget: Widget,
    pub timestamp: DateTime<Utc>,
    /// Screen the failure happened on.
    #[serde(default)]
    pub screen_id: String,
}

impl MistakeRecord {
    /// Widget ids are only unique within one lesson, so stored mistakes are
    /// told apart by lesson and widget together.
    pub fn book_key(&self) -> (&str, &str) {
        (&self.problem_name, &self.widget.id)
    }

    /// Id of the screen that replays this mistake in a review run.
    pub fn review_screen_id(&self) -> String {
        format!("review_{}", self.id)
    }
}

/// Session-scoped bookkeeping of failed widgets.
///
/// The log only grows. The retry queue collects single-widget screens until
/// the engine splices them onto the lesson, and the loop flag, once set,
/// stays set for the rest of the session.
#[derive(Debug, Default)]
pub struct MistakeManager {
    session_mistakes: Vec<MistakeRecord>,
    retry_queue: Vec<LessonScreen>,
    in_mistake_loop: bool,
}

impl MistakeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_mistakes(&self) -> &[MistakeRecord] {
        &self.session_mistakes
    }

    pub fn retry_queue(&self) -> &[LessonScreen] {
        &self.retry_queue
    }

    pub fn is_in_mistake_loop(&self) -> bool {
        self.in_mistake_loop
    }

    /// Record a failure on `screen`. Returns true when a new log entry was
    /// written.
    pub fn record_mistake(
        &mut self,
        screen: &LessonScreen,
        problem_name: &str,
        node_index: usize,
    ) -> bool {
        self.record_mistake_at(screen, problem_name, node_index, Utc::now())
    }

    fn record_mistake_at(
        &mut self,
        screen: &LessonScreen,
        problem_name: &str,
        node_index: usize,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(widget) = screen.target_widget() else {
            return false;
        };

        let repeated = self
            .session_mistakes
            .last()
            .is_some_and(|last| last.widget.id == widget.id);

        if !repeated {
            let context = screen
                .header
                .clone()
                .unwrap_or_else(|| widget.kind.summary());
            self.session_mistakes.push(MistakeRecord {
                id: format!("mistake_{}_{}", widget.id, now.timestamp_millis()),
                problem_name: problem_name.to_string(),
                node_index,
                question_type: widget.kind.type_name().to_string(),
                context,
                widget: widget.clone(),
                timestamp: now,
                screen_id: screen.id.clone(),
            });
            tracing::debug!(widget = %widget.id, screen = %screen.id, "mistake recorded");
        }

        // Review-phase failures are logged but never replayed again.
        if !self.in_mistake_loop {
            self.enqueue_retry(screen, widget, now);
        }
        !repeated
    }

    fn enqueue_retry(&mut self, screen: &LessonScreen, widget: &Widget, now: DateTime<Utc>) {
        let prefix = format!("retry_{}_", screen.id);
        let queued = self
            .retry_queue
            .iter()
            .any(|s| s.id == screen.id || s.id.starts_with(&prefix));
        if queued {
            return;
        }

        self.retry_queue.push(LessonScreen {
            id: format!("{prefix}{}", now.timestamp_millis()),
            header: Some(match &screen.header {
                Some(h) => format!("Review: {h}"),
                None => "Review".to_string(),
            }),
            widgets: vec![widget.clone()],
            is_retry: true,
        });
    }

    pub fn start_review_loop(&mut self) {
        self.in_mistake_loop = true;
    }

    pub fn clear_queue(&mut self) {
        self.retry_queue.clear();
    }

    /// Hand the queued retry screens to the caller and leave the queue empty.
    pub fn take_queue(&mut self) -> Vec<LessonScreen> {
        std::mem::take(&mut self.retry_queue)
    }
}
