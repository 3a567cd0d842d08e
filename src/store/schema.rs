use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::lesson::engine::{LessonCompletion, SessionStats};
use crate::lesson::mistakes::MistakeRecord;

pub const SCHEMA_VERSION: u32 = 1;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub total_xp: u64,
    pub lessons_completed: u32,
    /// Longest run of consecutive correct answers in any lesson.
    pub best_streak: u32,
    /// Consecutive practice days.
    pub streak_days: u32,
    pub best_streak_days: u32,
    pub last_practice_date: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_xp: 0,
            lessons_completed: 0,
            best_streak: 0,
            streak_days: 0,
            best_streak_days: 0,
            last_practice_date: None,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Fold a finished lesson into lifetime totals and the daily streak.
    pub fn record_lesson(&mut self, stats: &SessionStats, today: NaiveDate) {
        self.total_xp += u64::from(stats.xp);
        self.lessons_completed += 1;
        self.best_streak = self.best_streak.max(stats.streak);

        let today_str = today.format(DATE_FORMAT).to_string();
        if self.last_practice_date.as_deref() == Some(today_str.as_str()) {
            return;
        }
        let last = self
            .last_practice_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok());
        self.streak_days = match last {
            Some(last) if today.signed_duration_since(last).num_days() == 1 => {
                self.streak_days + 1
            }
            _ => 1,
        };
        self.best_streak_days = self.best_streak_days.max(self.streak_days);
        self.last_practice_date = Some(today_str);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MistakeBookData {
    pub schema_version: u32,
    pub mistakes: Vec<MistakeRecord>,
}

impl Default for MistakeBookData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            mistakes: Vec::new(),
        }
    }
}

impl MistakeBookData {
    /// Add mistakes from a finished lesson, keeping one entry per lesson
    /// and widget.
    pub fn merge(&mut self, mistakes: &[MistakeRecord]) {
        for m in mistakes {
            if !self.mistakes.iter().any(|e| e.book_key() == m.book_key()) {
                self.mistakes.push(m.clone());
            }
        }
    }

    /// After a review run, drop entries that were not failed again. A review
    /// failure points back at its entry through the review screen it
    /// happened on.
    pub fn settle_review(&mut self, failed_again: &[MistakeRecord]) {
        self.mistakes.retain(|e| {
            let review_screen = e.review_screen_id();
            failed_again
                .iter()
                .any(|m| m.screen_id == review_screen || m.book_key() == e.book_key())
        });
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonResult {
    pub title: String,
    pub node_index: usize,
    pub xp: u32,
    pub streak: u32,
    pub elapsed_secs: u64,
    pub mistakes: usize,
    #[serde(default)]
    pub review: bool,
    pub timestamp: DateTime<Utc>,
}

impl LessonResult {
    pub fn from_completion(
        title: &str,
        node_index: usize,
        review: bool,
        completion: &LessonCompletion,
    ) -> Self {
        Self {
            title: title.to_string(),
            node_index,
            xp: completion.stats.xp,
            streak: completion.stats.streak,
            elapsed_secs: completion.stats.elapsed_secs,
            mistakes: completion.mistakes.len(),
            review,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonHistoryData {
    pub schema_version: u32,
    pub lessons: Vec<LessonResult>,
}

impl Default for LessonHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lessons: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::plan::{Widget, WidgetKind};

    fn mistake(widget_id: &str) -> MistakeRecord {
        mistake_in("p", widget_id)
    }

    fn mistake_in(problem: &str, widget_id: &str) -> MistakeRecord {
        MistakeRecord {
            id: format!("mistake_{problem}_{widget_id}"),
            problem_name: problem.into(),
            node_index: 0,
            question_type: "quiz".into(),
            context: "c".into(),
            widget: Widget {
                id: widget_id.into(),
                kind: WidgetKind::Quiz {
                    question: "?".into(),
                    options: vec!["a".into()],
                    correct_index: 0,
                    explanation: None,
                },
            },
            timestamp: Utc::now(),
            screen_id: format!("s_{widget_id}"),
        }
    }

    /// What a review run records when the learner fails `entry` again.
    fn failed_in_review(entry: &MistakeRecord) -> MistakeRecord {
        MistakeRecord {
            problem_name: "Mistake review".into(),
            screen_id: entry.review_screen_id(),
            ..entry.clone()
        }
    }

    #[test]
    fn test_merge_keeps_one_entry_per_widget() {
        let mut book = MistakeBookData::default();
        book.merge(&[mistake("a"), mistake("b"), mistake("a")]);
        book.merge(&[mistake("b"), mistake("c")]);
        let ids: Vec<&str> = book.mistakes.iter().map(|m| m.widget.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_keeps_same_widget_id_from_different_lessons() {
        let mut book = MistakeBookData::default();
        book.merge(&[mistake_in("Stacks", "w2")]);
        book.merge(&[mistake_in("Heaps", "w2")]);
        let keys: Vec<(&str, &str)> = book.mistakes.iter().map(|m| m.book_key()).collect();
        assert_eq!(keys, vec![("Stacks", "w2"), ("Heaps", "w2")]);
    }

    #[test]
    fn test_settle_review_drops_fixed_widgets() {
        let mut book = MistakeBookData::default();
        book.merge(&[mistake("a"), mistake("b"), mistake("c")]);
        let again = failed_in_review(&book.mistakes[1]);
        book.settle_review(&[again]);
        assert_eq!(book.mistakes.len(), 1);
        assert_eq!(book.mistakes[0].widget.id, "b");
    }

    #[test]
    fn test_settle_review_tells_shared_widget_ids_apart() {
        let mut book = MistakeBookData::default();
        book.merge(&[mistake_in("Stacks", "w2"), mistake_in("Heaps", "w2")]);
        let again = failed_in_review(&book.mistakes[1]);
        book.settle_review(&[again]);
        assert_eq!(book.mistakes.len(), 1);
        assert_eq!(book.mistakes[0].book_key(), ("Heaps", "w2"));
    }

    fn stats(xp: u32, streak: u32) -> SessionStats {
        SessionStats {
            xp,
            streak,
            elapsed_secs: 60,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_record_lesson_totals() {
        let mut profile = ProfileData::default();
        profile.record_lesson(&stats(50, 5), day(1));
        profile.record_lesson(&stats(20, 2), day(1));
        assert_eq!(profile.total_xp, 70);
        assert_eq!(profile.lessons_completed, 2);
        assert_eq!(profile.best_streak, 5);
        assert_eq!(profile.streak_days, 1);
    }

    #[test]
    fn test_day_streak_continues_and_breaks() {
        let mut profile = ProfileData::default();
        profile.record_lesson(&stats(10, 1), day(1));
        profile.record_lesson(&stats(10, 1), day(2));
        profile.record_lesson(&stats(10, 1), day(3));
        assert_eq!(profile.streak_days, 3);
        profile.record_lesson(&stats(10, 1), day(6));
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.best_streak_days, 3);
        assert_eq!(profile.last_practice_date.as_deref(), Some("2026-03-06"));
    }

    #[test]
    fn test_profile_defaults_do_not_need_reset() {
        assert!(!ProfileData::default().needs_reset());
    }
}
