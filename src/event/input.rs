use std::{thread, time::Duration};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use tokio::sync::mpsc::Sender;

use crate::notification::{NotificationEvent, NotificationId};

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Quit,
    Startup,
    Notification(NotificationId, NotificationEvent),
    UpdateText(String),
    Dismiss,
    Remount,
}

pub type EventSender = Sender<AppEvent>;

pub fn start(event_sender: EventSender) {
    thread::spawn(move || {
        if event_sender.blocking_send(AppEvent::Startup).is_err() {
            return;
        }
        loop {
            let event = match poll(Duration::from_millis(1000)) {
                Ok(true) => match event::read() {
                    Ok(e) => e,
                    Err(err) => {
                        log::warn!("could not read terminal event: {}", err);
                        continue;
                    }
                },
                Ok(false) => continue,
                Err(err) => {
                    log::warn!("could not poll terminal: {}", err);
                    continue;
                }
            };

            let action: Option<AppEvent> = match event {
                // handle global keys
                Event::Key(key) => match key.modifiers {
                    KeyModifiers::CONTROL => match key.code {
                        KeyCode::Char('c') => Some(AppEvent::Quit),
                        _ => Some(AppEvent::Input(key)),
                    },
                    _ => Some(AppEvent::Input(key)),
                },
                Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
                Event::Resize(_, _) => Some(AppEvent::Tick),
                _ => None,
            };

            if let Some(a) = action {
                // the receiver is gone once the app quits
                if event_sender.blocking_send(a).is_err() {
                    return;
                }
            }
        }
    });
}
