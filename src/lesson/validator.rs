use icu_normalizer::ComposingNormalizerBorrowed;

use crate::lesson::plan::{FlipcardMode, Widget, WidgetKind};

/// What the learner has submitted for the widget on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AnswerState {
    #[default]
    Unanswered,
    /// Selected option index (quiz).
    Choice(usize),
    /// Arranged lines or steps, top to bottom.
    Ordering(Vec<String>),
    /// One entry per fill-in blank, in order.
    Blanks(Vec<String>),
    /// "Remembered" (true) or "forgot" (false) on an assessment flipcard.
    SelfReport(bool),
    /// Judge verdict for a LeetCode-style problem.
    Verdict(bool),
}

pub fn validate(widget: &Widget, answer: &AnswerState) -> bool {
    match &widget.kind {
        WidgetKind::Quiz { correct_index, .. } => {
            matches!(answer, AnswerState::Choice(i) if i == correct_index)
        }
        WidgetKind::Parsons { lines, .. } => match answer {
            AnswerState::Ordering(arranged) => arranged == lines,
            _ => false,
        },
        WidgetKind::FillIn { correct_values, .. } => match answer {
            AnswerState::Blanks(given) => {
                given.len() == correct_values.len()
                    && given
                        .iter()
                        .zip(correct_values)
                        .all(|(g, expected)| blank_matches(g, expected))
            }
            _ => false,
        },
        WidgetKind::Flipcard {
            mode: FlipcardMode::Assessment,
            ..
        } => matches!(answer, AnswerState::SelfReport(true)),
        WidgetKind::StepsList {
            items,
            interactive: true,
        } => {
            if items.is_empty() {
                return true;
            }
            match answer {
                AnswerState::Ordering(arranged) => arranged == items,
                _ => false,
            }
        }
        WidgetKind::Leetcode { .. } => matches!(answer, AnswerState::Verdict(true)),
        WidgetKind::Dialogue { .. }
        | WidgetKind::Callout { .. }
        | WidgetKind::Code { .. }
        | WidgetKind::InteractiveCode { .. }
        | WidgetKind::StepsList { .. }
        | WidgetKind::Flipcard { .. } => true,
    }
}

fn normalize_blank(s: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(s.trim()).to_lowercase()
}

fn blank_matches(given: &str, expected: &str) -> bool {
    normalize_blank(given) == normalize_blank(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::plan::InputMode;

    fn widget(kind: WidgetKind) -> Widget {
        Widget {
            id: "w".to_string(),
            kind,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fill_in(values: &[&str]) -> Widget {
        widget(WidgetKind::FillIn {
            code: "seen = __\nfor x in nums: __".into(),
            correct_values: strings(values),
            options: Vec::new(),
            input_mode: InputMode::Type,
        })
    }

    #[test]
    fn test_quiz_requires_matching_selection() {
        let w = widget(WidgetKind::Quiz {
            question: "Lookup cost?".into(),
            options: strings(&["O(1)", "O(n)"]),
            correct_index: 0,
            explanation: None,
        });
        assert!(validate(&w, &AnswerState::Choice(0)));
        assert!(!validate(&w, &AnswerState::Choice(1)));
        assert!(!validate(&w, &AnswerState::Unanswered));
    }

    #[test]
    fn test_parsons_requires_exact_order() {
        let w = widget(WidgetKind::Parsons {
            prompt: None,
            lines: strings(&["def f():", "    x = 1", "    return x"]),
        });
        assert!(validate(
            &w,
            &AnswerState::Ordering(strings(&["def f():", "    x = 1", "    return x"]))
        ));
        // Same length, wrong order.
        assert!(!validate(
            &w,
            &AnswerState::Ordering(strings(&["def f():", "    return x", "    x = 1"]))
        ));
        assert!(!validate(&w, &AnswerState::Ordering(strings(&["def f():"]))));
    }

    #[test]
    fn test_fill_in_is_case_and_whitespace_insensitive() {
        let w = fill_in(&["Hash Map"]);
        assert!(validate(&w, &AnswerState::Blanks(strings(&[" hash map "]))));
        assert!(!validate(&w, &AnswerState::Blanks(strings(&["hashmap"]))));
    }

    #[test]
    fn test_fill_in_normalizes_composed_characters() {
        let w = fill_in(&["caf\u{e9}"]);
        assert!(validate(&w, &AnswerState::Blanks(strings(&["CAFE\u{301}"]))));
    }

    #[test]
    fn test_fill_in_count_mismatch_is_incorrect() {
        let w = fill_in(&["set()", "seen.add(x)"]);
        assert!(!validate(&w, &AnswerState::Blanks(strings(&["set()"]))));
        assert!(validate(
            &w,
            &AnswerState::Blanks(strings(&["SET()", "seen.add(x)"]))
        ));
    }

    #[test]
    fn test_assessment_flipcard_uses_self_report() {
        let w = widget(WidgetKind::Flipcard {
            front: "BFS uses?".into(),
            back: "a queue".into(),
            mode: FlipcardMode::Assessment,
        });
        assert!(validate(&w, &AnswerState::SelfReport(true)));
        assert!(!validate(&w, &AnswerState::SelfReport(false)));
        assert!(!validate(&w, &AnswerState::Unanswered));
    }

    #[test]
    fn test_steps_list_ordering() {
        let w = widget(WidgetKind::StepsList {
            items: strings(&["init", "loop", "return"]),
            interactive: true,
        });
        assert!(validate(
            &w,
            &AnswerState::Ordering(strings(&["init", "loop", "return"]))
        ));
        assert!(!validate(
            &w,
            &AnswerState::Ordering(strings(&["loop", "init", "return"]))
        ));

        let empty = widget(WidgetKind::StepsList {
            items: Vec::new(),
            interactive: true,
        });
        assert!(validate(&empty, &AnswerState::Unanswered));
    }

    #[test]
    fn test_leetcode_needs_passing_verdict() {
        let w = widget(WidgetKind::Leetcode {
            title: "Two Sum".into(),
            description: "...".into(),
            starter_code: None,
        });
        assert!(validate(&w, &AnswerState::Verdict(true)));
        assert!(!validate(&w, &AnswerState::Verdict(false)));
        assert!(!validate(&w, &AnswerState::Choice(0)));
    }

    #[test]
    fn test_non_interactive_widgets_always_pass() {
        let widgets = [
            widget(WidgetKind::Dialogue {
                speaker: "Owl".into(),
                text: "hi".into(),
            }),
            widget(WidgetKind::Callout {
                title: None,
                text: "note".into(),
            }),
            widget(WidgetKind::Code {
                language: "rust".into(),
                code: "fn main() {}".into(),
            }),
            widget(WidgetKind::InteractiveCode {
                language: "python".into(),
                code: "x = 1".into(),
                annotations: Vec::new(),
                read_only: true,
            }),
        ];
        for w in &widgets {
            assert!(validate(w, &AnswerState::Unanswered));
        }
    }
}
