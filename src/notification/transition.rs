use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};

use super::{NotificationEvent, NotificationId};
use crate::event::input::{AppEvent, EventSender};

/// Fixed duration of the opacity transition.
pub const FADE_DURATION: Duration = Duration::from_millis(150);

const FRAME_INTERVAL: Duration = Duration::from_millis(25);

/// Opacity animation driver.
///
/// Every call to `to` starts a new cycle. While a cycle runs its task posts
/// `Tick` so the screen is redrawn, and posts `TransitionEnd(cycle)` when
/// the animation completes.
pub struct Fade {
    id: NotificationId,
    sender: EventSender,
    from: f32,
    target: f32,
    started: Instant,
    cycle: u64,
    driver: Option<JoinHandle<()>>,
}

impl Fade {
    pub fn new(id: NotificationId, sender: EventSender, opacity: f32) -> Self {
        Self {
            id,
            sender,
            from: opacity,
            target: opacity,
            started: Instant::now(),
            cycle: 0,
            driver: None,
        }
    }

    /// Starts animating towards `target` from whatever opacity is currently
    /// shown. Nothing happens when already heading there.
    pub fn to(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.from = self.opacity();
        self.target = target;
        self.started = Instant::now();
        self.cycle += 1;
        self.cancel();

        let id = self.id;
        let cycle = self.cycle;
        let sender = self.sender.clone();
        self.driver = Some(tokio::spawn(async move {
            let end = Instant::now() + FADE_DURATION;
            let mut frames = interval(FRAME_INTERVAL);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                frames.tick().await;
                if Instant::now() >= end {
                    break;
                }
                if sender.send(AppEvent::Tick).await.is_err() {
                    return;
                }
            }
            tokio::time::sleep_until(end).await;

            if sender
                .send(AppEvent::Notification(id, NotificationEvent::TransitionEnd(cycle)))
                .await
                .is_err()
            {
                log::warn!("notification {}: event channel closed before fade end", id);
            }
        }));
    }

    /// Opacity shown right now, between `0.0` and `1.0`.
    pub fn opacity(&self) -> f32 {
        let progress = self.started.elapsed().as_secs_f32() / FADE_DURATION.as_secs_f32();
        if progress >= 1.0 {
            return self.target;
        }

        // ease
        let eased = progress * progress * (3.0 - 2.0 * progress);
        self.from + (self.target - self.from) * eased
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_some()
    }

    /// Consumes a completion signal. Returns `false` when the signal belongs
    /// to a cycle which was superseded by a later one.
    pub fn finish(&mut self, cycle: u64) -> bool {
        if cycle != self.cycle || self.driver.is_none() {
            return false;
        }
        self.driver = None;
        self.from = self.target;
        true
    }

    pub fn cancel(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

impl Drop for Fade {
    fn drop(&mut self) {
        self.cancel();
    }
}
