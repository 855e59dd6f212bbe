mod app;

use anchor_display_config::Config;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    time::Instant,
};

/// Overrides the default config file location.
const CONFIG_ENV: &str = "ANCHOR_DISPLAY_CONFIG";

fn init_logging() -> Result<PathBuf> {
    // The alternate screen owns stdout/stderr, so records go to a file
    let log_path = env::temp_dir().join("anchor-display-cli.log");
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(log_path)
}

fn main() -> Result<()> {
    let log_path = init_logging()?;
    log::info!("anchor-display-cli starting up, logging to {}", log_path.display());

    let args: Vec<String> = env::args().collect();
    let file = match args.len() {
        1 => None,
        2 => Some(PathBuf::from(&args[1])),
        _ => {
            eprintln!("Usage: {} [markdown-file]", args[0]);
            process::exit(1);
        }
    };

    let config_path = match env::var_os(CONFIG_ENV) {
        Some(path) => Config::expand_path(Path::new(&path)),
        None => Config::config_path(),
    };
    log::info!("Config path: {}", config_path.display());

    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    log::debug!("Settings: {:?}", config.settings);

    let text = match &file {
        Some(path) if path.exists() => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => String::new(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&text, config.settings, file);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Wake up for the debounce deadline even without input
        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Instant::now());
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = match &app.file {
        Some(path) => format!(
            "{}{}",
            path.display(),
            if app.dirty { " [+]" } else { "" }
        ),
        None => "scratch".to_string(),
    };

    // Editor panel
    let cursor = app.cursor();
    let inner_height = chunks[0].height.saturating_sub(2) as usize;
    let scroll = cursor.line.saturating_sub(inner_height.saturating_sub(1));
    let text = app.buffer.text();
    let lines: Vec<Line> = text
        .split('\n')
        .map(|line| Line::from(line.trim_end_matches('\r').to_string()))
        .collect();

    let policy = format!(
        " {} | {} ",
        app.settings.include_note_name.label(),
        app.settings.which_headings.label()
    );
    let editor = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(policy),
        )
        .scroll((scroll as u16, 0));
    f.render_widget(editor, chunks[0]);

    let cursor_line = text.split('\n').nth(cursor.line).unwrap_or("");
    let col = cursor_line
        .get(..cursor.ch)
        .map_or(0, |before| before.chars().count());
    let cursor_x = chunks[0].x + 1 + col as u16;
    let cursor_y = chunks[0].y + 1 + (cursor.line - scroll) as u16;
    f.set_cursor_position((cursor_x, cursor_y));

    // Status bar
    let status = Paragraph::new(Line::from(vec![Span::styled(
        app.status.clone().unwrap_or_default(),
        Style::default().fg(Color::Yellow),
    )]));
    f.render_widget(status, chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("Ctrl-Q: Quit | "),
        Span::raw("Ctrl-S: Save | "),
        Span::raw("↑/↓: Choose | "),
        Span::raw("Enter: Accept | Esc: Dismiss"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[2]);

    if app.popup_open() {
        render_popup(f, app, chunks[0], cursor_x, cursor_y);
    }
}

fn render_popup(f: &mut Frame, app: &mut App, bounds: Rect, x: u16, y: u16) {
    let width = app
        .popup
        .rows
        .iter()
        .chain(app.popup.hint.iter())
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0) as u16
        + 4;
    let height = app.popup.rows.len() as u16 + 2;
    let area = Rect::new(x, y + 1, width, height).intersection(bounds);

    let items: Vec<ListItem> = app
        .popup
        .rows
        .iter()
        .map(|row| ListItem::new(Line::from(row.clone())))
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title("Display text");
    if let Some(hint) = &app.popup.hint {
        block = block.title_bottom(hint.clone());
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut app.popup_state);
}
