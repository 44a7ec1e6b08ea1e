pub mod layout;
pub mod notification;

use crate::app::App;
use crate::event::input::AppEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

pub trait View {
    fn handle(app: &App, event: AppEvent) -> Option<AppEvent>;
    fn draw(app: &mut App, frame: &mut Frame, area: Rect);
}
