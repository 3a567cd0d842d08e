use algolingo::content::parse_plan;
use algolingo::lesson::validator::{AnswerState, validate};
use algolingo::lesson::{
    LessonCompletion, LessonEngine, LessonPlan, LessonScreen, MistakeManager, PlanError, Status,
    Step, Widget, WidgetKind,
};

fn quiz(id: &str) -> Widget {
    Widget {
        id: id.to_string(),
        kind: WidgetKind::Quiz {
            question: format!("{id}?"),
            options: vec!["yes".into(), "no".into()],
            correct_index: 0,
            explanation: None,
        },
    }
}

fn callout(id: &str) -> Widget {
    Widget {
        id: id.to_string(),
        kind: WidgetKind::Callout {
            title: None,
            text: "Remember the invariant.".into(),
        },
    }
}

fn plan(n: usize) -> LessonPlan {
    LessonPlan {
        title: "Binary Search".to_string(),
        screens: (0..n)
            .map(|i| LessonScreen {
                id: format!("s{i}"),
                header: Some(format!("Step {}", i + 1)),
                widgets: vec![callout(&format!("c{i}")), quiz(&format!("q{i}"))],
                is_retry: false,
            })
            .collect(),
    }
}

fn completed(step: Step) -> LessonCompletion {
    match step {
        Step::Completed(c) => c,
        other => panic!("expected completion, got {other:?}"),
    }
}

/// Answer the current screen and move on.
fn answer(engine: &mut LessonEngine, correct: bool) -> Step {
    engine.check_answer(correct);
    engine.next_screen()
}

#[test]
fn all_correct_lesson_completes_with_full_xp() {
    let mut engine = LessonEngine::new(plan(3), 0, false).unwrap();
    assert!(matches!(answer(&mut engine, true), Step::Advanced(1)));
    assert!(matches!(answer(&mut engine, true), Step::Advanced(2)));
    let done = completed(answer(&mut engine, true));

    assert_eq!(done.stats.xp, 30);
    assert_eq!(done.stats.streak, 3);
    assert!(done.should_save);
    assert!(done.mistakes.is_empty());
    assert!(!engine.timer().is_active());
}

#[test]
fn retry_after_wrong_answer_records_one_mistake() {
    let mut engine = LessonEngine::new(plan(3), 0, false).unwrap();
    answer(&mut engine, true);

    assert_eq!(engine.check_answer(false), Status::Wrong);
    assert_eq!(engine.streak(), 0);
    engine.retry_current();
    assert_eq!(engine.status(), Status::Idle);
    assert_eq!(engine.current_index(), 1);
    answer(&mut engine, true);
    answer(&mut engine, true);

    // Retry screen for q1 spliced at the end.
    assert_eq!(engine.screens().len(), 4);
    assert!(engine.mistakes().is_in_mistake_loop());
    let done = completed(answer(&mut engine, true));

    assert_eq!(done.stats.streak, 3);
    assert_eq!(done.stats.xp, 40);
    assert_eq!(done.mistakes.len(), 1);
    assert_eq!(done.mistakes[0].widget.id, "q1");
    assert_eq!(done.mistakes[0].context, "Step 2");
}

#[test]
fn two_wrong_screens_splice_two_retries_once() {
    let mut engine = LessonEngine::new(plan(2), 0, false).unwrap();
    answer(&mut engine, false);
    let step = answer(&mut engine, false);

    assert!(matches!(step, Step::ReviewStarted { index: 2, retries: 2 }));
    assert_eq!(engine.screens().len(), 4);
    assert_eq!(engine.current_index(), 2);
    assert!(engine.current_screen().is_retry);
    assert!(engine.mistakes().is_in_mistake_loop());

    assert!(matches!(answer(&mut engine, false), Step::Advanced(3)));
    let done = completed(answer(&mut engine, true));
    assert_eq!(engine.screens().len(), 4);
    // Failing the first retry logs q0 again since q1 was the last entry.
    let ids: Vec<_> = done.mistakes.iter().map(|m| m.widget.id.as_str()).collect();
    assert_eq!(ids, ["q0", "q1", "q0"]);
}

#[test]
fn review_loop_fires_at_most_once() {
    let n = 8;
    let mut engine = LessonEngine::new(plan(n), 0, false).unwrap();
    for i in 0..n - 1 {
        answer(&mut engine, i != 2 && i != 5);
    }
    let step = answer(&mut engine, true);
    assert!(matches!(step, Step::ReviewStarted { retries: 2, .. }));
    assert_eq!(engine.screens().len(), n + 2);

    // Failing both retries again must not grow the sequence.
    answer(&mut engine, false);
    assert_eq!(engine.screens().len(), n + 2);
    let done = completed(answer(&mut engine, false));
    assert_eq!(engine.screens().len(), n + 2);
    assert_eq!(done.stats.streak, 0);
}

#[test]
fn completion_is_reported_once() {
    let mut engine = LessonEngine::new(plan(1), 0, false).unwrap();
    let mut completions = 0;
    engine.check_answer(true);
    for _ in 0..5 {
        if let Step::Completed(_) = engine.next_screen() {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
    assert!(engine.is_completed());
    assert_eq!(engine.check_answer(true), Status::Idle);
    assert_eq!(engine.xp_gained(), 10);
}

#[test]
fn streak_tracks_latest_run_and_xp_only_grows() {
    let pattern = [true, true, false, true, false, false, true, true, true];
    // Review mode keeps the screen count fixed so every answer hits a new screen.
    let mut engine = LessonEngine::new(plan(pattern.len()), 0, true).unwrap();
    let mut run = 0;
    let mut last_xp = 0;
    for &ok in &pattern {
        engine.check_answer(ok);
        run = if ok { run + 1 } else { 0 };
        assert_eq!(engine.streak(), run);
        let xp = engine.xp_gained();
        assert_eq!(xp, if ok { last_xp + 10 } else { last_xp });
        last_xp = xp;
        engine.next_screen();
    }
    assert!(engine.is_completed());
}

#[test]
fn decorative_screens_never_produce_mistakes() {
    let mut manager = MistakeManager::new();
    let screen = LessonScreen {
        id: "intro".into(),
        header: None,
        widgets: vec![callout("c0"), callout("c1")],
        is_retry: false,
    };
    assert!(!manager.record_mistake(&screen, "Binary Search", 0));
    assert!(manager.session_mistakes().is_empty());
    assert!(manager.retry_queue().is_empty());
}

#[test]
fn repeated_failure_on_same_widget_is_logged_once() {
    let mut manager = MistakeManager::new();
    let screen = plan(1).screens.remove(0);
    assert!(manager.record_mistake(&screen, "Binary Search", 0));
    assert!(!manager.record_mistake(&screen, "Binary Search", 0));
    assert_eq!(manager.session_mistakes().len(), 1);
    assert_eq!(manager.retry_queue().len(), 1);
}

#[test]
fn fill_in_ignores_case_and_surrounding_space() {
    let widget = Widget {
        id: "f".into(),
        kind: WidgetKind::FillIn {
            code: "seen = __()".into(),
            correct_values: vec!["Hash Map".into()],
            options: Vec::new(),
            input_mode: Default::default(),
        },
    };
    assert!(validate(&widget, &AnswerState::Blanks(vec![" hash map ".into()])));
    assert!(!validate(&widget, &AnswerState::Blanks(vec!["hashmap".into()])));
}

#[test]
fn review_mode_never_splices_retries() {
    let mut engine = LessonEngine::new(plan(2), 0, true).unwrap();
    answer(&mut engine, false);
    let done = completed(answer(&mut engine, false));
    assert_eq!(engine.screens().len(), 2);
    assert!(!engine.mistakes().is_in_mistake_loop());
    assert_eq!(done.mistakes.len(), 2);
}

#[test]
fn empty_plan_is_rejected() {
    let empty = LessonPlan {
        title: "Nothing".into(),
        screens: Vec::new(),
    };
    assert_eq!(
        LessonEngine::new(empty, 0, false).err(),
        Some(PlanError::NoScreens)
    );
}

#[test]
fn generated_text_runs_as_lesson() {
    let raw = r#"Here you go:
```json
{"title":"Stacks","screens":[
  {"id":"a","widgets":[{"id":"d","type":"dialogue","speaker":"Owl","text":"Push and pop."}]},
  {"id":"b","widgets":[
    {"id":"s","type":"steps-list","items":["push 1","push 2","pop"]},
    {"id":"q","type":"quiz","question":"Order?","options":["LIFO","FIFO"],"correctIndex":0}
  ]}
]}
```"#;
    let plan = parse_plan(raw).unwrap();
    let mut engine = LessonEngine::new(plan, 3, false).unwrap();
    assert_eq!(engine.submit(&AnswerState::Unanswered), Status::Idle);
    engine.next_screen();
    assert_eq!(engine.submit(&AnswerState::Choice(0)), Status::Correct);
    let done = completed(engine.next_screen());
    assert_eq!((done.stats.xp, done.stats.streak), (10, 1));
}
