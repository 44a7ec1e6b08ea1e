use std::{
    fmt::Display,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crossterm::event::{Event, KeyCode};
use ratatui::{backend::Backend, layout::Rect, Terminal};
use tokio::sync::mpsc::{Receiver, Sender};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::{
    config::Config,
    event::input::AppEvent,
    notification::{Notification, NotificationProps},
    theme::Theme,
    view::{layout::LayoutView, notification::NotificationView, View},
};

#[derive(PartialEq, Eq, Debug)]
pub enum InputMode {
    Normal,
    Command,
}

impl Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub notification: Option<Notification>,
    pub dismiss_link_area: Option<Rect>,
    pub input_mode: InputMode,
    pub command_input: Input,
    removal_requested: Arc<AtomicBool>,
    receiver: Receiver<AppEvent>,
    sender: Sender<AppEvent>,
    quit: bool,
}

impl App {
    pub fn new(config: Config, receiver: Receiver<AppEvent>, sender: Sender<AppEvent>) -> App {
        App {
            theme: config.theme,
            config,
            notification: None,
            dismiss_link_area: None,
            input_mode: InputMode::Normal,
            command_input: Input::default(),
            removal_requested: Arc::new(AtomicBool::new(false)),
            receiver,
            sender,
            quit: false,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), anyhow::Error> {
        self.mount();

        loop {
            if !self.step().await? {
                return Ok(());
            }

            terminal.autoresize()?;
            terminal.draw(|frame| {
                let area = frame.area();
                LayoutView::draw(self, frame, area);
            })?;
        }
    }

    /// Waits for and handles the next event. Returns `false` once the app
    /// should quit.
    pub async fn step(&mut self) -> Result<bool, anyhow::Error> {
        let event = match self.receiver.recv().await {
            Some(event) => event,
            None => return Ok(false),
        };

        self.handle_event(event).await?;

        Ok(!self.quit)
    }

    /// Mounts a notification from the configuration unless one is live.
    pub fn mount(&mut self) {
        if self.notification.is_some() {
            return;
        }

        // on_dismiss runs inside handle_event, which unmounts once it returns
        let removal_requested = self.removal_requested.clone();
        self.removal_requested.store(false, Ordering::SeqCst);
        self.notification = Some(Notification::create(
            self.config.props(),
            move || removal_requested.store(true, Ordering::SeqCst),
            self.sender.clone(),
        ));
    }

    fn unmount(&mut self) {
        if let Some(notification) = self.notification.take() {
            notification.destroy();
        }
        self.dismiss_link_area = None;
    }

    async fn handle_event(&mut self, event: AppEvent) -> Result<(), anyhow::Error> {
        match event {
            AppEvent::Quit => self.quit = true,
            AppEvent::Tick | AppEvent::Startup => (),
            AppEvent::Notification(id, event) => {
                match self.notification.as_mut() {
                    Some(n) if n.id() == id => n.handle(event),
                    // addressed to a notification which is gone
                    _ => log::trace!("dropping {:?} for notification {}", event, id),
                }
            }
            AppEvent::UpdateText(text) => {
                if let Some(n) = self.notification.as_mut() {
                    let props = NotificationProps {
                        text,
                        ..n.props().clone()
                    };
                    n.update(props);
                }
            }
            AppEvent::Dismiss => {
                if let Some(n) = self.notification.as_mut() {
                    n.user_dismiss();
                }
            }
            AppEvent::Remount => self.mount(),
            AppEvent::Mouse(_) => {
                if let Some(event) = NotificationView::handle(self, event) {
                    self.sender.send(event).await?;
                }
            }
            AppEvent::Input(e) => match self.input_mode {
                InputMode::Normal => {
                    if let KeyCode::Char(char) = e.code {
                        match char {
                            'x' => self.sender.send(AppEvent::Dismiss).await?,
                            'n' => self.sender.send(AppEvent::Remount).await?,
                            't' => self.theme = self.theme.next(),
                            'q' => self.sender.send(AppEvent::Quit).await?,
                            ':' => {
                                if let Some(n) = &self.notification {
                                    self.command_input = Input::new(n.props().text.clone());
                                    self.input_mode = InputMode::Command;
                                }
                            }
                            _ => (),
                        }
                    }
                }
                InputMode::Command => match e.code {
                    // escape back to normal mode
                    KeyCode::Esc => {
                        self.input_mode = InputMode::Normal;
                        self.command_input.reset();
                    }
                    // apply the new text
                    KeyCode::Enter => {
                        self.input_mode = InputMode::Normal;
                        let text = self.command_input.value().to_string();
                        self.command_input.reset();
                        self.sender.send(AppEvent::UpdateText(text)).await?;
                    }
                    // delegate keys to command input
                    _ => {
                        self.command_input.handle_event(&Event::Key(e));
                    }
                },
            },
        };

        if self.removal_requested.swap(false, Ordering::SeqCst) {
            log::debug!("unmounting dismissed notification");
            self.unmount();
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notification::NotificationEvent;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, Instant};

    fn app(config: Config) -> App {
        let (sender, receiver) = mpsc::channel(1024);
        App::new(config, receiver, sender)
    }

    fn key(c: char) -> AppEvent {
        AppEvent::Input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    async fn step_until_removed(app: &mut App) -> Result<(), anyhow::Error> {
        while app.notification.is_some() {
            app.step().await?;
        }
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_removes_after_fade() -> Result<(), anyhow::Error> {
        let mut config = Config::new("Saved".to_string());
        config.dismiss_after = Some(Duration::from_millis(3000));
        let mut app = app(config);
        let start = Instant::now();

        app.mount();
        step_until_removed(&mut app).await?;

        assert_eq!(Duration::from_millis(3150), start.elapsed());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_updated_text_postpones_removal() -> Result<(), anyhow::Error> {
        let mut config = Config::new("Saved".to_string());
        config.dismiss_after = Some(Duration::from_millis(3000));
        let mut app = app(config);
        let start = Instant::now();

        app.mount();
        sleep(Duration::from_millis(1000)).await;
        app.handle_event(AppEvent::UpdateText("Saved again".to_string())).await?;
        step_until_removed(&mut app).await?;

        assert_eq!(Duration::from_millis(4150), start.elapsed());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_key() -> Result<(), anyhow::Error> {
        let mut app = app(Config::new("Saved".to_string()));
        let start = Instant::now();

        app.mount();
        app.handle_event(key('x')).await?;
        step_until_removed(&mut app).await?;

        assert_eq!(Duration::from_millis(150), start.elapsed());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_key_ignored_when_not_dismissable() -> Result<(), anyhow::Error> {
        let mut config = Config::new("Saved".to_string());
        config.dismissable = false;
        let mut app = app(config);

        app.mount();
        app.handle_event(key('x')).await?;
        app.step().await?;

        let notification = app.notification.as_ref().unwrap();
        assert!(!notification.is_dismissing());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_text_in_command_mode() -> Result<(), anyhow::Error> {
        let mut app = app(Config::new("Saved".to_string()));
        app.mount();

        app.handle_event(key(':')).await?;
        assert_eq!(InputMode::Command, app.input_mode);
        assert_eq!("Saved", app.command_input.value());

        app.handle_event(key('!')).await?;
        app.handle_event(AppEvent::Input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .await?;
        assert_eq!(InputMode::Normal, app.input_mode);

        // UpdateText
        app.step().await?;
        assert_eq!("Saved!", app.notification.as_ref().unwrap().props().text);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_remount_after_removal() -> Result<(), anyhow::Error> {
        let mut app = app(Config::new("Saved".to_string()));
        app.mount();
        let first = app.notification.as_ref().unwrap().id();

        app.handle_event(AppEvent::Remount).await?;
        assert_eq!(first, app.notification.as_ref().unwrap().id());

        app.handle_event(AppEvent::Dismiss).await?;
        step_until_removed(&mut app).await?;
        app.handle_event(AppEvent::Remount).await?;
        assert!(app.notification.as_ref().unwrap().id() != first);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_survives_full_event_channel() -> Result<(), anyhow::Error> {
        let (sender, receiver) = mpsc::channel(4);
        let mut app = App::new(Config::new("Saved".to_string()), receiver, sender);
        app.mount();
        let id = app.notification.as_ref().unwrap().id();

        app.handle_event(AppEvent::Dismiss).await?;
        while app.sender.try_send(AppEvent::Tick).is_ok() {}

        app.handle_event(AppEvent::Notification(id, NotificationEvent::TransitionEnd(1)))
            .await?;
        assert!(app.notification.is_none());

        // nothing left over to unmount a later notification
        app.mount();
        for _ in 0..4 {
            app.step().await?;
        }
        assert!(app.notification.is_some());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit() -> Result<(), anyhow::Error> {
        let mut app = app(Config::new("Saved".to_string()));
        app.handle_event(key('q')).await?;
        assert!(!app.step().await?);
        Ok(())
    }
}
