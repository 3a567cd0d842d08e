use rand::Rng;
use rand::seq::SliceRandom;

use crate::lesson::plan::{FlipcardMode, InputMode, Widget, WidgetKind};
use crate::lesson::validator::AnswerState;

/// Interaction state for the checkable widget on the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInput {
    /// Nothing to answer; continuing is always allowed.
    Passive,
    Choice {
        options: usize,
        selected: Option<usize>,
    },
    /// Pick items from a shuffled pool to build an ordering.
    Arrange {
        pool: Vec<String>,
        placed: Vec<String>,
    },
    Blanks {
        values: Vec<String>,
        options: Vec<String>,
        mode: InputMode,
        focus: usize,
    },
    Flip {
        flipped: bool,
        report: Option<bool>,
    },
    Verdict(Option<bool>),
}

impl AnswerInput {
    pub fn for_widget<R: Rng>(widget: Option<&Widget>, shuffle: bool, rng: &mut R) -> Self {
        let Some(widget) = widget else {
            return AnswerInput::Passive;
        };
        match &widget.kind {
            WidgetKind::Quiz { options, .. } => AnswerInput::Choice {
                options: options.len(),
                selected: None,
            },
            WidgetKind::Parsons { lines, .. } => Self::arrange(lines, shuffle, rng),
            WidgetKind::StepsList {
                items,
                interactive: true,
            } if !items.is_empty() => Self::arrange(items, shuffle, rng),
            WidgetKind::FillIn {
                correct_values,
                options,
                input_mode,
                ..
            } => AnswerInput::Blanks {
                values: vec![String::new(); correct_values.len()],
                options: options.clone(),
                mode: *input_mode,
                focus: 0,
            },
            WidgetKind::Flipcard {
                mode: FlipcardMode::Assessment,
                ..
            } => AnswerInput::Flip {
                flipped: false,
                report: None,
            },
            WidgetKind::Leetcode { .. } => AnswerInput::Verdict(None),
            _ => AnswerInput::Passive,
        }
    }

    fn arrange<R: Rng>(items: &[String], shuffle: bool, rng: &mut R) -> Self {
        let mut pool = items.to_vec();
        if shuffle {
            pool.shuffle(rng);
        }
        AnswerInput::Arrange {
            pool,
            placed: Vec::new(),
        }
    }

    /// Whether the learner has given enough input to check.
    pub fn is_ready(&self) -> bool {
        match self {
            AnswerInput::Passive => true,
            AnswerInput::Choice { selected, .. } => selected.is_some(),
            AnswerInput::Arrange { pool, .. } => pool.is_empty(),
            AnswerInput::Blanks { values, .. } => values.iter().all(|v| !v.trim().is_empty()),
            AnswerInput::Flip { report, .. } => report.is_some(),
            AnswerInput::Verdict(v) => v.is_some(),
        }
    }

    pub fn to_answer_state(&self) -> AnswerState {
        match self {
            AnswerInput::Passive => AnswerState::Unanswered,
            AnswerInput::Choice { selected, .. } => {
                selected.map_or(AnswerState::Unanswered, AnswerState::Choice)
            }
            AnswerInput::Arrange { placed, .. } => AnswerState::Ordering(placed.clone()),
            AnswerInput::Blanks { values, .. } => AnswerState::Blanks(values.clone()),
            AnswerInput::Flip { report, .. } => {
                report.map_or(AnswerState::Unanswered, AnswerState::SelfReport)
            }
            AnswerInput::Verdict(v) => v.map_or(AnswerState::Unanswered, AnswerState::Verdict),
        }
    }

    /// Number keys: pick a quiz option, move a pool item into place, or fill
    /// the focused blank from the option bank. `n` is zero-based.
    pub fn pick(&mut self, n: usize) {
        match self {
            AnswerInput::Choice { options, selected } if n < *options => *selected = Some(n),
            AnswerInput::Arrange { pool, placed } if n < pool.len() => {
                placed.push(pool.remove(n));
            }
            AnswerInput::Blanks {
                values,
                options,
                mode: InputMode::Select,
                focus,
            } if n < options.len() && *focus < values.len() => {
                values[*focus] = options[n].clone();
                if *focus + 1 < values.len() {
                    *focus += 1;
                }
            }
            _ => {}
        }
    }

    pub fn move_selection(&mut self, down: bool) {
        match self {
            AnswerInput::Choice { options, selected } if *options > 0 => {
                let next = match (*selected, down) {
                    (None, _) => 0,
                    (Some(i), true) => (i + 1) % *options,
                    (Some(0), false) => *options - 1,
                    (Some(i), false) => i - 1,
                };
                *selected = Some(next);
            }
            AnswerInput::Blanks { values, focus, .. } if !values.is_empty() => {
                *focus = if down {
                    (*focus + 1) % values.len()
                } else if *focus == 0 {
                    values.len() - 1
                } else {
                    *focus - 1
                };
            }
            _ => {}
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if let AnswerInput::Blanks {
            values,
            mode: InputMode::Type,
            focus,
            ..
        } = self
            && let Some(v) = values.get_mut(*focus)
        {
            v.push(ch);
        }
    }

    /// Undo the last placement or delete the last typed character.
    pub fn backspace(&mut self) {
        match self {
            AnswerInput::Arrange { pool, placed } => {
                if let Some(item) = placed.pop() {
                    pool.push(item);
                }
            }
            AnswerInput::Blanks {
                values,
                mode,
                focus,
                ..
            } => {
                if let Some(v) = values.get_mut(*focus) {
                    match mode {
                        InputMode::Type => {
                            v.pop();
                        }
                        InputMode::Select => v.clear(),
                    }
                }
            }
            _ => {}
        }
    }

    pub fn flip(&mut self) {
        if let AnswerInput::Flip { flipped, .. } = self {
            *flipped = !*flipped;
        }
    }

    /// Self-report on a flipcard or a LeetCode attempt. Flipcards must be
    /// turned over first.
    pub fn report(&mut self, passed: bool) {
        match self {
            AnswerInput::Flip {
                flipped: true,
                report,
            } => *report = Some(passed),
            AnswerInput::Verdict(v) => *v = Some(passed),
            _ => {}
        }
    }
}
