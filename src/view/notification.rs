use super::View;
use crate::app::App;
use crate::event::input::AppEvent;
use crate::notification::Notification;
use crate::theme::Scheme;
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const PADDING_X: u16 = 2;
const PADDING_Y: u16 = 1;
const MARGIN_LEFT: u16 = 1;
const DISMISS_LINK: &str = "[x]";

pub struct NotificationView {}

impl View for NotificationView {
    fn handle(app: &App, event: AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return None;
                }
                let link = app.dismiss_link_area?;
                match link.contains(Position::new(mouse.column, mouse.row)) {
                    true => Some(AppEvent::Dismiss),
                    false => None,
                }
            }
            _ => None,
        }
    }

    fn draw(app: &mut App, frame: &mut Frame, area: Rect) {
        app.dismiss_link_area = None;
        let notification = match &app.notification {
            Some(n) => n,
            None => return,
        };
        let scheme = app.theme.scheme();
        let opacity = notification.rendered_opacity();
        if opacity <= 0.0 {
            return;
        }

        let line = notification_line(notification, &scheme);
        let style = fade(notification_style(notification, &scheme), opacity, scheme.background);
        let line = Line::from(
            line.spans
                .into_iter()
                .map(|span| {
                    let span_style = fade(span.style, opacity, scheme.background);
                    span.style(span_style)
                })
                .collect::<Vec<Span>>(),
        );

        let notification_area = bounds(clamp_width(line.width()), area);
        let link_area = match notification.props().user_dismissable {
            true => dismiss_link_area(notification, notification_area),
            false => None,
        };
        app.dismiss_link_area = link_area;

        frame.render_widget(
            Paragraph::new(line).style(style).block(
                Block::default().padding(Padding::new(PADDING_X, PADDING_X, PADDING_Y, PADDING_Y)),
            ),
            notification_area,
        );
    }
}

/// Base style of the theme with the owner's color overrides on top.
pub fn notification_style(notification: &Notification, scheme: &Scheme) -> Style {
    let props = notification.props();
    let mut overrides = Style::default();
    if let Some(bg) = props.background_color {
        overrides = overrides.bg(bg);
    }
    if let Some(fg) = props.color {
        overrides = overrides.fg(fg);
    }
    scheme.notification.patch(overrides)
}

/// Content in render order: leading content, the message (or children
/// replacing it), the dismiss link and trailing content.
pub fn notification_line(notification: &Notification, scheme: &Scheme) -> Line<'static> {
    let props = notification.props();
    let mut spans: Vec<Span<'static>> = vec![];

    if let Some(before) = &props.custom_children_before {
        spans.extend(before.spans.iter().cloned());
    }
    match &props.children {
        Some(children) => spans.extend(children.spans.iter().cloned()),
        None => spans.push(Span::raw(props.text.clone())),
    }
    if props.user_dismissable {
        let mut link_style = scheme.notification_dismiss_link;
        if let Some(color) = props.user_dismiss_color {
            link_style = link_style.fg(color);
        }
        spans.push(Span::raw(" "));
        spans.push(Span::styled(DISMISS_LINK, link_style));
    }
    if let Some(after) = &props.custom_children {
        spans.extend(after.spans.iter().cloned());
    }

    Line::from(spans)
}

/// Notification box in the bottom right corner of `area`.
fn bounds(content_width: u16, area: Rect) -> Rect {
    let width = content_width
        .saturating_add(PADDING_X * 2)
        .min(area.width.saturating_sub(MARGIN_LEFT));
    let height = (1 + PADDING_Y * 2).min(area.height);
    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    }
}

fn dismiss_link_area(notification: &Notification, area: Rect) -> Option<Rect> {
    let props = notification.props();
    let leading: usize = props
        .custom_children_before
        .as_ref()
        .map_or(0, |line| line.width())
        + props
            .children
            .as_ref()
            .map_or(Span::raw(props.text.as_str()).width(), |line| line.width())
        + 1;

    let link = Rect {
        x: area.x.saturating_add(PADDING_X).saturating_add(clamp_width(leading)),
        y: area.y + PADDING_Y,
        width: DISMISS_LINK.len() as u16,
        height: 1,
    };
    match area.intersection(link) {
        visible if visible.is_empty() => None,
        visible => Some(visible),
    }
}

fn clamp_width(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Approximates opacity on a terminal. RGB colors are blended into the
/// background, anything else is dimmed once the fade is under way.
pub fn fade(style: Style, opacity: f32, background: Color) -> Style {
    if opacity >= 1.0 {
        return style;
    }
    let mut faded = style;
    let mut dim = false;
    if let Some(fg) = style.fg {
        match blend(fg, background, opacity) {
            Some(c) => faded = faded.fg(c),
            None => dim = true,
        }
    }
    if let Some(bg) = style.bg {
        match blend(bg, background, opacity) {
            Some(c) => faded = faded.bg(c),
            None => dim = true,
        }
    }
    if dim || style.fg.is_none() {
        faded = faded.add_modifier(Modifier::DIM);
    }
    faded
}

fn blend(color: Color, background: Color, opacity: f32) -> Option<Color> {
    match (color, background) {
        (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
            let mix = |c: u8, base: u8| (base as f32 + (c as f32 - base as f32) * opacity).round() as u8;
            Some(Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notification::NotificationProps;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn notification(props: NotificationProps) -> Notification {
        let (sender, _) = mpsc::channel(8);
        Notification::create(props, || {}, sender)
    }

    #[tokio::test]
    async fn test_line_with_text() {
        let n = notification(NotificationProps::new("Saved"));
        let line = notification_line(&n, &Theme::Dark.scheme());
        assert_eq!("Saved", line.to_string());
    }

    #[tokio::test]
    async fn test_line_render_order() {
        let n = notification(
            NotificationProps::new("Saved")
                .user_dismissable(true)
                .custom_children_before(Line::from("> "))
                .custom_children(Line::from(" <")),
        );
        let line = notification_line(&n, &Theme::Dark.scheme());
        assert_eq!("> Saved [x] <", line.to_string());
    }

    #[tokio::test]
    async fn test_children_replace_text() {
        let n = notification(NotificationProps::new("Saved").children(Line::from("Saved to disk")));
        let line = notification_line(&n, &Theme::Dark.scheme());
        assert_eq!("Saved to disk", line.to_string());
    }

    #[tokio::test]
    async fn test_dismiss_link_color() {
        let n = notification(
            NotificationProps::new("Saved")
                .user_dismissable(true)
                .user_dismiss_color(Color::Red),
        );
        let line = notification_line(&n, &Theme::Dark.scheme());
        let link = line.spans.last().unwrap();
        assert_eq!(DISMISS_LINK, link.content);
        assert_eq!(Some(Color::Red), link.style.fg);
        assert!(link.style.add_modifier.contains(Modifier::BOLD));
    }

    #[tokio::test]
    async fn test_color_overrides_win_over_theme() {
        let scheme = Theme::Dark.scheme();
        let plain = notification(NotificationProps::new("Saved"));
        assert_eq!(scheme.notification, notification_style(&plain, &scheme));

        let colored = notification(
            NotificationProps::new("Saved")
                .background_color(Color::Blue)
                .color(Color::Yellow),
        );
        let style = notification_style(&colored, &scheme);
        assert_eq!(Some(Color::Blue), style.bg);
        assert_eq!(Some(Color::Yellow), style.fg);
    }

    #[test]
    fn test_fade_blends_rgb_into_background() {
        let style = Style::default().fg(Color::Rgb(255, 255, 255)).bg(Color::Rgb(100, 0, 0));

        assert_eq!(style, fade(style, 1.0, Color::Rgb(0, 0, 0)));
        let half = fade(style, 0.5, Color::Rgb(0, 0, 0));
        assert_eq!(Some(Color::Rgb(128, 128, 128)), half.fg);
        assert_eq!(Some(Color::Rgb(50, 0, 0)), half.bg);
        assert!(!half.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_fade_dims_named_colors() {
        let style = Style::default().fg(Color::White);
        let faded = fade(style, 0.5, Color::Rgb(0, 0, 0));
        assert_eq!(Some(Color::White), faded.fg);
        assert!(faded.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_bounds_bottom_right() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(Rect::new(31, 7, 9, 3), bounds(5, area));
    }

    #[tokio::test]
    async fn test_long_text_is_cut_at_the_edge() {
        let n = notification(NotificationProps::new("a".repeat(65533)).user_dismissable(true));
        let area = Rect::new(0, 0, 80, 24);

        let width = clamp_width(notification_line(&n, &Theme::Dark.scheme()).width());
        assert_eq!(u16::MAX, width);
        assert_eq!(Rect::new(1, 21, 79, 3), bounds(width, area));
        assert_eq!(None, dismiss_link_area(&n, bounds(width, area)));
    }

    #[tokio::test]
    async fn test_dismiss_link_area() {
        let n = notification(
            NotificationProps::new("Saved")
                .user_dismissable(true)
                .custom_children_before(Line::from("> ")),
        );
        let area = Rect::new(10, 5, 20, 3);
        // padding, "> ", "Saved", " "
        assert_eq!(Some(Rect::new(20, 6, 3, 1)), dismiss_link_area(&n, area));
    }
}
