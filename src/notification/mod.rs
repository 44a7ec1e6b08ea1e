//! A single transient notification.
//!
//! The notification is visible until it is dismissed, either by its dismiss
//! timer or by the user. Dismissing starts a fade-out; only when the fade has
//! completed is the owner asked, through `on_dismiss`, to remove it.
//!
//! ```text
//!   Visible --timer expiry / user dismiss--> Dismissing --fade end--> on_dismiss()
//!      ^                                          |
//!      +---------------- text changed -------------+
//! ```

pub mod timer;
pub mod transition;

use std::{
    fmt::Display,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use ratatui::{style::Color, text::Line};

use crate::event::input::EventSender;
use timer::DismissTimer;
use transition::Fade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Signals addressed to a notification by its timer and fade driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    TimerExpired(u64),
    TransitionEnd(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissState {
    Visible,
    Dismissing,
}

/// Called once the notification has faded out and should be removed.
pub type OnDismiss = Box<dyn FnOnce() + Send>;

/// Everything the owner supplies to a notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationProps {
    pub text: String,
    pub custom_children_before: Option<Line<'static>>,
    /// Shown instead of `text` when set.
    pub children: Option<Line<'static>>,
    pub custom_children: Option<Line<'static>>,
    pub background_color: Option<Color>,
    pub color: Option<Color>,
    pub user_dismiss_color: Option<Color>,
    pub user_dismissable: bool,
    pub dismiss_after: Option<Duration>,
}

impl NotificationProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dismiss_after(mut self, duration: Duration) -> Self {
        self.dismiss_after = Some(duration);
        self
    }

    #[must_use]
    pub fn user_dismissable(mut self, dismissable: bool) -> Self {
        self.user_dismissable = dismissable;
        self
    }

    #[must_use]
    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn user_dismiss_color(mut self, color: Color) -> Self {
        self.user_dismiss_color = Some(color);
        self
    }

    #[must_use]
    pub fn children(mut self, children: Line<'static>) -> Self {
        self.children = Some(children);
        self
    }

    #[must_use]
    pub fn custom_children_before(mut self, content: Line<'static>) -> Self {
        self.custom_children_before = Some(content);
        self
    }

    #[must_use]
    pub fn custom_children(mut self, content: Line<'static>) -> Self {
        self.custom_children = Some(content);
        self
    }

    /// Auto-dismiss delay; a zero duration counts as absent.
    pub fn dismiss_delay(&self) -> Option<Duration> {
        self.dismiss_after.filter(|d| !d.is_zero())
    }
}

pub struct Notification {
    id: NotificationId,
    props: NotificationProps,
    state: DismissState,
    timer: DismissTimer,
    fade: Fade,
    on_dismiss: Option<OnDismiss>,
}

impl Notification {
    /// Mounts a notification, arming the dismiss timer when `dismiss_after`
    /// is set. Timer and fade signals are posted to `sender` and must be fed
    /// back through `handle`.
    pub fn create(
        props: NotificationProps,
        on_dismiss: impl FnOnce() + Send + 'static,
        sender: EventSender,
    ) -> Self {
        let id = NotificationId::new();
        let mut notification = Self {
            id,
            timer: DismissTimer::new(id, sender.clone()),
            fade: Fade::new(id, sender, 1.0),
            props,
            state: DismissState::Visible,
            on_dismiss: Some(Box::new(on_dismiss)),
        };

        if let Some(delay) = notification.props.dismiss_delay() {
            notification.timer.arm(delay);
        }
        log::debug!("notification {}: created \"{}\"", id, notification.props.text);

        notification
    }

    /// Applies new props from the owner.
    ///
    /// A changed text restarts a running countdown and cancels a dismissal in
    /// progress. Only the text is compared: new children or colors alone do
    /// neither.
    pub fn update(&mut self, props: NotificationProps) {
        let previous = std::mem::replace(&mut self.props, props);
        if self.props.text == previous.text {
            return;
        }

        if previous.dismiss_delay().is_some() {
            match self.props.dismiss_delay() {
                Some(delay) => self.timer.arm(delay),
                None => self.timer.cancel(),
            }
        }

        if self.state == DismissState::Dismissing {
            log::debug!("notification {}: text changed while dismissing", self.id);
            self.set_state(DismissState::Visible);
        }
    }

    /// Starts dismissing. Returns `false` if already dismissing.
    pub fn dismiss(&mut self) -> bool {
        if self.state == DismissState::Dismissing {
            return false;
        }
        self.set_state(DismissState::Dismissing);
        true
    }

    /// Dismissal through the `[x]` affordance, which only exists for user
    /// dismissable notifications.
    pub fn user_dismiss(&mut self) -> bool {
        if !self.props.user_dismissable {
            return false;
        }
        self.dismiss()
    }

    pub fn handle(&mut self, event: NotificationEvent) {
        match event {
            NotificationEvent::TimerExpired(generation) => {
                if !self.timer.expire(generation) {
                    log::trace!("notification {}: ignoring stale timer #{}", self.id, generation);
                    return;
                }
                log::debug!("notification {}: dismiss timer expired", self.id);
                self.dismiss();
            }
            NotificationEvent::TransitionEnd(cycle) => {
                if !self.fade.finish(cycle) {
                    log::trace!("notification {}: ignoring stale fade #{}", self.id, cycle);
                    return;
                }
                // the state may have changed since the fade started
                if self.state != DismissState::Dismissing {
                    return;
                }
                if let Some(on_dismiss) = self.on_dismiss.take() {
                    log::debug!("notification {}: faded out, requesting removal", self.id);
                    on_dismiss();
                }
            }
        }
    }

    /// Unmounts the notification. Its timer and fade are cancelled, so no
    /// signal of this instance is acted upon afterwards.
    pub fn destroy(mut self) {
        self.timer.cancel();
        self.fade.cancel();
        log::debug!("notification {}: destroyed", self.id);
    }

    fn set_state(&mut self, state: DismissState) {
        self.state = state;
        self.fade.to(self.opacity());
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn props(&self) -> &NotificationProps {
        &self.props
    }

    pub fn state(&self) -> DismissState {
        self.state
    }

    pub fn is_dismissing(&self) -> bool {
        self.state == DismissState::Dismissing
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_running()
    }

    /// Opacity the notification is heading to: `0.0` when dismissing.
    pub fn opacity(&self) -> f32 {
        match self.state {
            DismissState::Visible => 1.0,
            DismissState::Dismissing => 0.0,
        }
    }

    /// Opacity to draw right now, part way through a fade.
    pub fn rendered_opacity(&self) -> f32 {
        self.fade.opacity()
    }
}
