use crate::core::AppCore;
use crate::frontend::tui::canvas::BufferCanvas;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use std::io;
use std::time::Duration;

const HELP: &str = " drag or ←/→ to scrub · PgUp/PgDn item · Home/End · q quit ";

/// TUI Frontend using ratatui
///
/// Renders the loading widget with ratatui and handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables mouse capture and focus
    /// reporting, and enters alternate screen.
    pub fn new(poll_timeout: Duration) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )
        .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout,
            restored: false,
        })
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
                if key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Some(FrontendEvent::quit());
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
                mouse_event.modifiers,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            Event::FocusLost => Some(FrontendEvent::FocusLost),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Block up to the poll timeout for the first event, then drain
        let mut timeout = self.poll_timeout;
        while event::poll(timeout)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn render(&mut self, app: &mut AppCore) -> Result<()> {
        let widget_area = app.widget_area();

        self.terminal.draw(|f| {
            let terminal_area = f.area();

            if terminal_area.height > 0 {
                let status = Line::from(vec![
                    Span::styled(
                        format!(" {}/{} ", app.widget.progress(), app.widget.max()),
                        Style::default().fg(Color::Black).bg(Color::White),
                    ),
                    Span::styled(HELP, Style::default().fg(Color::DarkGray)),
                ]);
                let status_area = Rect::new(
                    0,
                    terminal_area.height.saturating_sub(1),
                    terminal_area.width,
                    1,
                );
                f.render_widget(Paragraph::new(status), status_area);
            }

            let area = widget_area.intersection(terminal_area);
            if area.width == 0 || area.height == 0 {
                return;
            }
            tracing::trace!(?area, "Painting widget");
            let mut canvas = BufferCanvas::new(f.buffer_mut(), area);
            app.widget.draw(&mut canvas);
        })?;

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}
