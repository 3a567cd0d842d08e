mod app;
mod config;
mod content;
mod event;
mod lesson;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen};
use config::Config;
use content::{ContentGenerator, LessonRequest, bundled};
use content::client::HttpGenerator;
use event::{AppEvent, EventHandler};
use lesson::engine::Status;
use lesson::input::AnswerInput;
use lesson::plan::{InputMode, LessonPlan};
use store::json_store::JsonStore;
use ui::components::lesson_view::LessonView;
use ui::components::result_view::ResultView;
use ui::components::session_panel::{LessonHeader, SessionSidebar};
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "algolingo",
    version,
    about = "Bite-sized algorithm lessons in the terminal"
)]
struct Cli {
    #[arg(short, long, help = "Open a lesson plan JSON file")]
    plan: Option<PathBuf>,

    #[arg(short, long, help = "Open a bundled lesson by name")]
    lesson: Option<String>,

    #[arg(long, help = "Generate a lesson on this topic")]
    topic: Option<String>,

    #[arg(short, long, default_value_t = 0, help = "Lesson node index on the learning path")]
    node: usize,

    #[arg(short, long, help = "Review saved mistakes")]
    review: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "List bundled lessons and themes, then exit")]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list {
        println!("Lessons:");
        for name in bundled::available_lessons() {
            println!("  {name}");
        }
        println!("Themes:");
        for name in Theme::available_themes() {
            println!("  {name}");
        }
        return Ok(());
    }

    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("Logging disabled: {e:#}");
    }
    if let Some(e) = config_err {
        tracing::warn!(error = %e, "config unreadable, using defaults");
    }

    let theme_name = cli.theme.clone().unwrap_or_else(|| config.theme.clone());
    let theme = Theme::load(&theme_name).unwrap_or_else(|| {
        tracing::warn!(theme = %theme_name, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    // Load before touching the terminal so errors print normally.
    let initial = match initial_plan(&cli, &config) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let mut app = App::new(config, theme);
    if let Some(plan) = initial {
        app.start_lesson(plan, cli.node, false)?;
    } else if cli.review
        && let Err(e) = app.start_review()
    {
        app.notice = Some(e.to_string());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging(default_level: &str) -> Result<()> {
    let dir = JsonStore::default_dir();
    fs::create_dir_all(&dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("algolingo.log"))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

fn initial_plan(cli: &Cli, config: &Config) -> Result<Option<LessonPlan>> {
    if let Some(path) = &cli.plan {
        return bundled::load_file(path).map(Some);
    }
    if let Some(name) = &cli.lesson {
        return bundled::load_bundled(name).map(Some);
    }
    if let Some(topic) = &cli.topic {
        let generator = HttpGenerator::from_config(config)?;
        let mut request = LessonRequest::new(topic, cli.node);
        request.language = config.code_language.clone();
        eprintln!("Generating a lesson on \"{topic}\"...");
        let plan = generator
            .generate_lesson(&request)
            .with_context(|| format!("could not generate a lesson on {topic:?}"))?;
        return Ok(Some(plan));
    }
    Ok(None)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            // Redraw only: the clock lives on the lesson timer thread.
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Lesson => handle_lesson_key(app, key),
        AppScreen::LessonResult => handle_result_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Char('r') => {
            app.menu.select_review();
            app.start_menu_selection();
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() && ch != '0' => {
            let index = ch as usize - '1' as usize;
            if index + 1 < app.menu.items.len() {
                app.menu.select(index);
                app.start_menu_selection();
            }
        }
        KeyCode::Enter => app.start_menu_selection(),
        _ => {}
    }
}

fn handle_lesson_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('p') {
        app.toggle_pause();
        return;
    }
    if key.code == KeyCode::Esc {
        app.abandon();
        return;
    }
    if app.paused {
        return;
    }

    match app.status() {
        Some(Status::Idle) => {}
        Some(Status::Wrong) => {
            match key.code {
                KeyCode::Enter => app.confirm(),
                KeyCode::Char('r') => app.retry(),
                _ => {}
            }
            return;
        }
        _ => {
            if key.code == KeyCode::Enter {
                app.confirm();
            }
            return;
        }
    }

    let typing = matches!(
        app.answer,
        AnswerInput::Blanks {
            mode: InputMode::Type,
            ..
        }
    );
    match key.code {
        KeyCode::Enter => app.confirm(),
        KeyCode::Backspace => app.answer.backspace(),
        KeyCode::Up => app.answer.move_selection(false),
        KeyCode::Down | KeyCode::Tab => app.answer.move_selection(true),
        KeyCode::Char(ch) if typing => app.answer.type_char(ch),
        KeyCode::Char(' ') => app.answer.flip(),
        KeyCode::Char('y') => app.answer.report(true),
        KeyCode::Char('n') => app.answer.report(false),
        KeyCode::Char(ch) if ch.is_ascii_digit() && ch != '0' => {
            app.answer.pick(ch as usize - '1' as usize);
        }
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => {
            if let Err(e) = app.start_review() {
                app.notice = Some(e.to_string());
            }
        }
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Lesson => render_lesson(frame, app),
        AppScreen::LessonResult => render_result(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let streak_text = if app.profile.streak_days > 0 {
        format!(" | {} day streak", app.profile.streak_days)
    } else {
        String::new()
    };
    let header_info = format!(
        " {} XP | {} lessons{streak_text}",
        app.profile.total_xp, app.profile.lessons_completed
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " algolingo ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    render_notice(frame, app, layout[2]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [1-9] Start  [r] Review mistakes  [j/k] Move  [q] Quit ",
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_notice(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    if let Some(notice) = &app.notice {
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(app.theme.colors.streak()),
        )));
        frame.render_widget(line, area);
    }
}

fn lesson_hints(app: &App) -> Vec<&'static str> {
    if app.paused {
        return vec!["[Ctrl+P] Resume", "[Esc] Quit lesson"];
    }
    let mut hints = match (app.status(), &app.answer) {
        (Some(Status::Wrong), _) => vec!["[Enter] Continue", "[r] Try again"],
        (Some(Status::Correct), _) => vec!["[Enter] Continue"],
        (_, AnswerInput::Passive) => vec!["[Enter] Continue"],
        (_, AnswerInput::Choice { .. }) => vec!["[1-9] Choose", "[↑/↓] Move", "[Enter] Check"],
        (_, AnswerInput::Arrange { .. }) => {
            vec!["[1-9] Place line", "[Backspace] Undo", "[Enter] Check"]
        }
        (
            _,
            AnswerInput::Blanks {
                mode: InputMode::Type,
                ..
            },
        ) => vec!["Type answer", "[Tab] Next blank", "[Enter] Check"],
        (_, AnswerInput::Blanks { .. }) => {
            vec!["[1-9] Fill blank", "[Tab] Next blank", "[Backspace] Clear", "[Enter] Check"]
        }
        (_, AnswerInput::Flip { .. }) => {
            vec!["[Space] Flip", "[y] Knew it", "[n] Didn't", "[Enter] Check"]
        }
        (_, AnswerInput::Verdict(_)) => vec!["[y] Solved", "[n] Not yet", "[Enter] Check"],
    };
    hints.extend(["[Ctrl+P] Pause", "[Esc] Quit lesson"]);
    hints
}

fn render_lesson(frame: &mut ratatui::Frame, app: &App) {
    let Some(engine) = &app.engine else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;

    let hint_lines: Vec<Line> = pack_hint_lines(&lesson_hints(app), area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
        .collect();
    let app_layout = AppLayout::new(area, hint_lines.len() as u16 + 1);

    frame.render_widget(
        LessonHeader::new(engine, app.paused, app.theme),
        app_layout.header,
    );

    frame.render_widget(
        LessonView::new(engine.current_screen(), &app.answer, engine.status(), app.theme),
        app_layout.main,
    );

    if let Some(sidebar_area) = app_layout.sidebar {
        frame.render_widget(SessionSidebar::new(engine, app.theme), sidebar_area);
    }

    let footer_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(app_layout.footer);
    render_notice(frame, app, footer_rows[0]);
    frame.render_widget(Paragraph::new(hint_lines), footer_rows[1]);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(result) = &app.last_result else {
        return;
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let centered = centered_rect(60, 70, layout[0]);
    frame.render_widget(
        ResultView {
            result,
            mistakes: &app.last_mistakes,
            profile: &app.profile,
            theme: app.theme,
        },
        centered,
    );

    render_notice(frame, app, layout[1]);
    let footer = Paragraph::new(Line::from(Span::styled(
        " [Enter] Menu  [r] Review mistakes  [q] Back ",
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, layout[2]);
}
