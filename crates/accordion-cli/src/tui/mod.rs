//! Interactive TUI for building a campaign and previewing its timeline.

pub mod app;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use app::{App, InputMode, Panel};

/// Launch the interactive session.
pub fn run_session(mut app: App) -> Result<()> {
    // Runs before raw mode so an error leaves the terminal untouched.
    app.open_dated_timeline()?;

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if !event::poll(app.tick_rate)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.should_quit = true;
        } else if matches!(app.input_mode, InputMode::EditingDate { .. }) {
            match key.code {
                KeyCode::Enter => app.commit_date(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Backspace => app.pop_char(),
                KeyCode::Char(c) => app.push_char(c),
                _ => {}
            }
        } else {
            // Clear status message on any keypress.
            app.status_message = None;

            let outcome = match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    app.navigate_back();
                    Ok(())
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    app.move_down();
                    Ok(())
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    app.move_up();
                    Ok(())
                }
                KeyCode::Char('h') | KeyCode::Left => {
                    app.level_left();
                    Ok(())
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    app.level_right();
                    Ok(())
                }
                KeyCode::Tab => {
                    app.cycle_focus();
                    Ok(())
                }
                KeyCode::Enter => match app.focus {
                    Panel::Selector => app.add_selected(),
                    Panel::Assets => {
                        app.begin_date_edit();
                        Ok(())
                    }
                    Panel::Timeline => Ok(()),
                },
                KeyCode::Char('a') if app.focus == Panel::Selector => app.add_selected(),
                KeyCode::Char('d') if app.focus == Panel::Assets => {
                    app.begin_date_edit();
                    Ok(())
                }
                KeyCode::Char('x') | KeyCode::Delete if app.focus == Panel::Assets => {
                    app.remove_selected()
                }
                KeyCode::Char('g') => app.generate(),
                KeyCode::Char('m') => {
                    app.toggle_mode();
                    Ok(())
                }
                KeyCode::Char('e') => app.export(),
                KeyCode::Char('?') => {
                    app.show_help();
                    Ok(())
                }
                _ => Ok(()),
            };

            if let Err(e) = outcome {
                app.status_message = Some(format!("Error: {e:#}"));
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
