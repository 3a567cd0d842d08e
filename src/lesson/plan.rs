use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lesson::mistakes::MistakeRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("lesson plan has no screens")]
    NoScreens,
    #[error("screen `{0}` has no widgets")]
    EmptyScreen(String),
    #[error("screen id `{0}` appears more than once")]
    DuplicateScreenId(String),
    #[error("quiz `{widget}` points at option {index} but has {options} options")]
    QuizIndexOutOfRange {
        widget: String,
        index: usize,
        options: usize,
    },
    #[error("parsons puzzle `{0}` has no lines")]
    EmptyParsons(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub title: String,
    pub screens: Vec<LessonScreen>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonScreen {
    pub id: String,
    #[serde(default)]
    pub header: Option<String>,
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub is_retry: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipcardMode {
    #[default]
    Learn,
    Assessment,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Select,
    Type,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetKind {
    Dialogue {
        speaker: String,
        text: String,
    },
    Callout {
        #[serde(default)]
        title: Option<String>,
        text: String,
    },
    Flipcard {
        front: String,
        back: String,
        #[serde(default)]
        mode: FlipcardMode,
    },
    #[serde(rename_all = "camelCase")]
    InteractiveCode {
        language: String,
        code: String,
        #[serde(default)]
        annotations: Vec<String>,
        #[serde(default = "default_true")]
        read_only: bool,
    },
    StepsList {
        items: Vec<String>,
        #[serde(default)]
        interactive: bool,
    },
    Parsons {
        #[serde(default)]
        prompt: Option<String>,
        lines: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    FillIn {
        code: String,
        correct_values: Vec<String>,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default)]
        input_mode: InputMode,
    },
    #[serde(rename_all = "camelCase")]
    Quiz {
        question: String,
        options: Vec<String>,
        correct_index: usize,
        #[serde(default)]
        explanation: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Leetcode {
        title: String,
        description: String,
        #[serde(default)]
        starter_code: Option<String>,
    },
    Code {
        language: String,
        code: String,
    },
}

impl WidgetKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            WidgetKind::Dialogue { .. } => "dialogue",
            WidgetKind::Callout { .. } => "callout",
            WidgetKind::Flipcard { .. } => "flipcard",
            WidgetKind::InteractiveCode { .. } => "interactive-code",
            WidgetKind::StepsList { .. } => "steps-list",
            WidgetKind::Parsons { .. } => "parsons",
            WidgetKind::FillIn { .. } => "fill-in",
            WidgetKind::Quiz { .. } => "quiz",
            WidgetKind::Leetcode { .. } => "leetcode",
            WidgetKind::Code { .. } => "code",
        }
    }

    /// Widgets with a checkable answer. An assessment flipcard counts because
    /// the learner's self-report is its verdict.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            WidgetKind::Quiz { .. }
                | WidgetKind::Parsons { .. }
                | WidgetKind::FillIn { .. }
                | WidgetKind::Leetcode { .. }
                | WidgetKind::StepsList { .. }
                | WidgetKind::Flipcard {
                    mode: FlipcardMode::Assessment,
                    ..
                }
        )
    }

    /// Widgets the learner actually answers. Unlike `is_interactive`, a
    /// steps-list only counts when it asks for ordering and has items.
    pub fn is_checkable(&self) -> bool {
        match self {
            WidgetKind::StepsList { interactive, items } => *interactive && !items.is_empty(),
            other => other.is_interactive(),
        }
    }

    pub fn is_decorative(&self) -> bool {
        matches!(
            self,
            WidgetKind::Dialogue { .. } | WidgetKind::Callout { .. } | WidgetKind::Code { .. }
        )
    }

    /// Short human-readable text describing what the widget asked.
    pub fn summary(&self) -> String {
        match self {
            WidgetKind::Dialogue { text, .. } | WidgetKind::Callout { text, .. } => text.clone(),
            WidgetKind::Flipcard { front, .. } => front.clone(),
            WidgetKind::InteractiveCode { code, .. } | WidgetKind::Code { code, .. } => {
                code.lines().next().unwrap_or_default().to_string()
            }
            WidgetKind::StepsList { items, .. } => items.first().cloned().unwrap_or_default(),
            WidgetKind::Parsons { prompt, lines } => prompt
                .clone()
                .unwrap_or_else(|| format!("Arrange {} lines", lines.len())),
            WidgetKind::FillIn { code, .. } => code.clone(),
            WidgetKind::Quiz { question, .. } => question.clone(),
            WidgetKind::Leetcode { title, .. } => title.clone(),
        }
    }
}

impl LessonScreen {
    /// Pick the widget a failure on this screen refers to: the first
    /// interactive widget, else the first non-decorative one.
    pub fn target_widget(&self) -> Option<&Widget> {
        self.widgets
            .iter()
            .find(|w| w.kind.is_interactive())
            .or_else(|| self.widgets.iter().find(|w| !w.kind.is_decorative()))
    }

    /// The widget whose answer decides this screen, if any.
    pub fn checkable_widget(&self) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.kind.is_checkable())
    }
}

impl LessonPlan {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.screens.is_empty() {
            return Err(PlanError::NoScreens);
        }

        let mut seen = HashSet::new();
        for screen in &self.screens {
            if !seen.insert(screen.id.as_str()) {
                return Err(PlanError::DuplicateScreenId(screen.id.clone()));
            }
            if screen.widgets.is_empty() {
                return Err(PlanError::EmptyScreen(screen.id.clone()));
            }
            for widget in &screen.widgets {
                match &widget.kind {
                    WidgetKind::Quiz {
                        options,
                        correct_index,
                        ..
                    } if *correct_index >= options.len() => {
                        return Err(PlanError::QuizIndexOutOfRange {
                            widget: widget.id.clone(),
                            index: *correct_index,
                            options: options.len(),
                        });
                    }
                    WidgetKind::Parsons { lines, .. } if lines.is_empty() => {
                        return Err(PlanError::EmptyParsons(widget.id.clone()));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Build a mistake-repair lesson: one review screen per stored mistake,
    /// oldest first.
    pub fn from_mistakes(mistakes: &[MistakeRecord]) -> Self {
        let screens = mistakes
            .iter()
            .map(|m| LessonScreen {
                id: m.review_screen_id(),
                header: Some(format!("Review: {}", m.problem_name)),
                widgets: vec![m.widget.clone()],
                is_retry: true,
            })
            .collect();
        Self {
            title: "Mistake review".to_string(),
            screens,
        }
    }

    pub fn interactive_count(&self) -> usize {
        self.screens
            .iter()
            .filter(|s| s.checkable_widget().is_some())
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn quiz(id: &str, correct_index: usize) -> Widget {
        Widget {
            id: id.to_string(),
            kind: WidgetKind::Quiz {
                question: format!("question {id}"),
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_index,
                explanation: None,
            },
        }
    }

    pub fn dialogue(id: &str) -> Widget {
        Widget {
            id: id.to_string(),
            kind: WidgetKind::Dialogue {
                speaker: "Owl".into(),
                text: "Hashing maps keys to buckets.".into(),
            },
        }
    }

    pub fn screen(id: &str, widgets: Vec<Widget>) -> LessonScreen {
        LessonScreen {
            id: id.to_string(),
            header: None,
            widgets,
            is_retry: false,
        }
    }

    /// One dialogue plus one quiz per screen.
    pub fn quiz_plan(n: usize) -> LessonPlan {
        LessonPlan {
            title: "Two Sum".to_string(),
            screens: (0..n)
                .map(|i| {
                    screen(
                        &format!("s{i}"),
                        vec![dialogue(&format!("d{i}")), quiz(&format!("q{i}"), 0)],
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_deserialize_widget_json() {
        let json = r#"{
            "title": "Hash maps",
            "screens": [
                {
                    "id": "s1",
                    "header": "Intro",
                    "widgets": [
                        {"id": "w1", "type": "dialogue", "speaker": "Owl", "text": "hi"},
                        {"id": "w2", "type": "quiz", "question": "?", "options": ["a", "b"], "correctIndex": 1}
                    ]
                },
                {
                    "id": "s2",
                    "widgets": [
                        {"id": "w3", "type": "fill-in", "code": "m = __()", "correctValues": ["dict"], "inputMode": "type"},
                        {"id": "w4", "type": "flipcard", "front": "O(1)?", "back": "yes", "mode": "assessment"},
                        {"id": "w5", "type": "interactive-code", "language": "python", "code": "x = 1"}
                    ]
                }
            ]
        }"#;
        let plan: LessonPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.screens.len(), 2);
        assert_eq!(plan.screens[0].header.as_deref(), Some("Intro"));
        assert!(!plan.screens[0].is_retry);
        assert!(matches!(
            plan.screens[0].widgets[1].kind,
            WidgetKind::Quiz { correct_index: 1, .. }
        ));
        assert!(matches!(
            plan.screens[1].widgets[0].kind,
            WidgetKind::FillIn {
                input_mode: InputMode::Type,
                ..
            }
        ));
        assert!(matches!(
            plan.screens[1].widgets[2].kind,
            WidgetKind::InteractiveCode { read_only: true, .. }
        ));
        assert_eq!(plan.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_plan() {
        let plan = LessonPlan {
            title: "empty".into(),
            screens: Vec::new(),
        };
        assert_eq!(plan.validate(), Err(PlanError::NoScreens));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids_and_bad_quiz() {
        let mut plan = quiz_plan(2);
        plan.screens[1].id = "s0".into();
        assert_eq!(
            plan.validate(),
            Err(PlanError::DuplicateScreenId("s0".into()))
        );

        let mut plan = quiz_plan(1);
        plan.screens[0].widgets[1] = quiz("q0", 7);
        assert!(matches!(
            plan.validate(),
            Err(PlanError::QuizIndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_target_widget_prefers_interactive() {
        let s = screen("s", vec![dialogue("d"), quiz("q", 0)]);
        assert_eq!(s.target_widget().map(|w| w.id.as_str()), Some("q"));
    }

    #[test]
    fn test_target_widget_falls_back_to_non_decorative() {
        let learn_card = Widget {
            id: "f".into(),
            kind: WidgetKind::Flipcard {
                front: "f".into(),
                back: "b".into(),
                mode: FlipcardMode::Learn,
            },
        };
        let s = screen("s", vec![dialogue("d"), learn_card]);
        assert_eq!(s.target_widget().map(|w| w.id.as_str()), Some("f"));
    }

    #[test]
    fn test_target_widget_none_for_decorative_screen() {
        let s = screen("s", vec![dialogue("d1"), dialogue("d2")]);
        assert!(s.target_widget().is_none());
    }

    #[test]
    fn test_checkable_widget_skips_static_steps_list() {
        let steps = Widget {
            id: "steps".into(),
            kind: WidgetKind::StepsList {
                items: vec!["push".into(), "pop".into()],
                interactive: false,
            },
        };
        let s = screen("s", vec![steps.clone(), quiz("q", 0)]);
        assert_eq!(s.checkable_widget().map(|w| w.id.as_str()), Some("q"));

        let only_steps = screen("t", vec![dialogue("d"), steps]);
        assert!(only_steps.checkable_widget().is_none());
        assert_eq!(only_steps.target_widget().map(|w| w.id.as_str()), Some("steps"));
    }

    #[test]
    fn test_interactive_count() {
        let mut plan = quiz_plan(3);
        plan.screens.push(screen("talk", vec![dialogue("dx")]));
        assert_eq!(plan.interactive_count(), 3);
    }
}
