use super::notification::NotificationView;
use super::View;
use crate::app::App;
use crate::app::InputMode;
use crate::event::input::AppEvent;
use crate::notification::DismissState;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub struct LayoutView {}

impl View for LayoutView {
    fn handle(_app: &App, _event: AppEvent) -> Option<AppEvent> {
        None
    }

    fn draw(app: &mut App, f: &mut Frame, area: Rect) {
        let constraints = vec![Constraint::Min(1), Constraint::Length(1)];

        let rows = Layout::default()
            .margin(0)
            .constraints(constraints)
            .split(area);

        NotificationView::draw(app, f, rows[0]);

        match app.input_mode {
            InputMode::Normal => f.render_widget(status_widget(app), rows[1]),
            InputMode::Command => {
                let scroll = app.command_input.visual_scroll(rows[1].width.saturating_sub(1) as usize);
                f.render_widget(
                    Paragraph::new(format!(":{}", app.command_input.value()))
                        .style(app.theme.scheme().command_input)
                        .scroll((0, scroll as u16)),
                    rows[1],
                );
                f.set_cursor_position(Position::new(
                    rows[1].x + 1 + (app.command_input.visual_cursor().max(scroll) - scroll) as u16,
                    rows[1].y,
                ));
            }
        }
    }
}

fn status_widget(app: &App) -> Paragraph {
    let state = match &app.notification {
        None => "removed".to_string(),
        Some(n) => match (n.state(), n.is_fading()) {
            (DismissState::Dismissing, true) => "dismissing".to_string(),
            (DismissState::Dismissing, false) => "faded out".to_string(),
            (DismissState::Visible, true) => "fading in".to_string(),
            (DismissState::Visible, false) => match n.is_timer_armed() {
                true => "visible (timer armed)".to_string(),
                false => "visible".to_string(),
            },
        },
    };

    Paragraph::new(Line::from(vec![
        Span::raw(format!(" {} ", state)),
        Span::raw(" [x] dismiss [:] edit text [n] new [t] theme [q] quit"),
    ]))
    .style(app.theme.scheme().status)
}
