use crate::config::Config;
use crate::core::drag::{DragController, PointerEvent};
use crate::frontend::FrontendEvent;
use crate::widgets::FloatTextLoading;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

/// Core application state (frontend-agnostic)
///
/// Owns the widget and the drag controller, decides where the widget sits on
/// the screen, and routes frontend events to them. Frontends only read from
/// AppCore when painting.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// The loading widget being driven
    pub widget: FloatTextLoading,

    /// Application running flag
    pub running: bool,

    drag: DragController,

    /// Screen area the widget occupies (terminal cells)
    widget_area: Rect,

    /// Set when something outside the widget (layout) needs a repaint
    needs_render: bool,
}

impl AppCore {
    pub fn new(config: Config) -> Self {
        let widget = FloatTextLoading::new(&config.widget, config.style.clone());
        let drag = DragController::new(config.drag.slop);
        tracing::info!(
            progress = widget.progress(),
            max = widget.max(),
            items = config.widget.item_count,
            "Widget created"
        );

        Self {
            config,
            widget,
            running: true,
            drag,
            widget_area: Rect::default(),
            needs_render: true,
        }
    }

    pub fn widget_area(&self) -> Rect {
        self.widget_area
    }

    /// Lay the widget out for a new terminal size and re-measure it.
    pub fn resize(&mut self, width: u16, height: u16) {
        let ui = &self.config.ui;
        let widget_width = width.saturating_sub(ui.margin.saturating_mul(2));
        let widget_height = ui.height.min(height);
        self.widget_area = Rect::new(
            ui.margin.min(width),
            height.saturating_sub(widget_height) / 2,
            widget_width,
            widget_height,
        );

        self.widget
            .measure(f32::from(widget_width), f32::from(widget_height));
        // A drag cannot survive the widget moving under the pointer
        self.drag.handle(PointerEvent::Cancel, &mut self.widget);
        self.needs_render = true;
    }

    /// True if the next loop iteration should paint.
    pub fn take_render_request(&mut self) -> bool {
        let widget = self.widget.take_redraw_request();
        std::mem::take(&mut self.needs_render) || widget
    }

    pub fn handle_event(&mut self, event: FrontendEvent) {
        match event {
            FrontendEvent::Key { code, modifiers } => self.handle_key(code, modifiers),
            FrontendEvent::Mouse { kind, x, y, .. } => self.handle_mouse(kind, x, y),
            FrontendEvent::Resize { width, height } => self.resize(width, height),
            FrontendEvent::FocusLost => {
                self.drag.handle(PointerEvent::Cancel, &mut self.widget);
            }
            FrontendEvent::Quit => self.running = false,
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let progress = self.widget.progress();
        let page = self.widget.state().progress_per_item().max(1);
        match code {
            KeyCode::Char('q') | KeyCode::Esc if modifiers.is_empty() => self.running = false,
            KeyCode::Left => self.widget.set_progress(progress.saturating_sub(1)),
            KeyCode::Right => self.widget.set_progress(progress.saturating_add(1)),
            KeyCode::PageDown => self.widget.set_progress(progress.saturating_sub(page)),
            KeyCode::PageUp => self.widget.set_progress(progress.saturating_add(page)),
            KeyCode::Home => self.widget.set_progress(0),
            KeyCode::End => self.widget.set_progress(self.widget.max()),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, x: u16, y: u16) {
        let area = self.widget_area;
        let local_x = f32::from(x) - f32::from(area.x);
        let local_y = f32::from(y) - f32::from(area.y);

        let event = match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = x >= area.x
                    && x < area.x + area.width
                    && y >= area.y
                    && y < area.y + area.height;
                if !inside {
                    return;
                }
                PointerEvent::Down {
                    x: local_x,
                    y: local_y,
                }
            }
            // Once captured, moves count even when they leave the widget
            MouseEventKind::Drag(MouseButton::Left) if self.drag.is_active() => {
                PointerEvent::Move {
                    x: local_x,
                    y: local_y,
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.drag.is_active() => PointerEvent::Up {
                x: local_x,
                y: local_y,
            },
            _ => return,
        };

        self.drag.handle(event, &mut self.widget);
    }
}
