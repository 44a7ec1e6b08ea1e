use std::time::Duration;

use tokio::{task::JoinHandle, time::sleep};

use super::{NotificationEvent, NotificationId};
use crate::event::input::{AppEvent, EventSender};

struct Armed {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Single-shot, re-armable timer which posts `TimerExpired` to the event
/// channel. At most one timer task exists per instance.
pub struct DismissTimer {
    id: NotificationId,
    sender: EventSender,
    generation: u64,
    armed: Option<Armed>,
}

impl DismissTimer {
    pub fn new(id: NotificationId, sender: EventSender) -> Self {
        Self {
            id,
            sender,
            generation: 0,
            armed: None,
        }
    }

    /// Arms the timer, cancelling any outstanding one first.
    pub fn arm(&mut self, after: Duration) {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let id = self.id;
        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            sleep(after).await;
            if sender
                .send(AppEvent::Notification(
                    id,
                    NotificationEvent::TimerExpired(generation),
                ))
                .await
                .is_err()
            {
                log::warn!("notification {}: event channel closed before timer expiry", id);
            }
        });

        log::trace!("notification {}: armed timer #{} for {:?}", self.id, generation, after);
        self.armed = Some(Armed { generation, handle });
    }

    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.handle.abort();
            log::trace!("notification {}: cancelled timer #{}", self.id, armed.generation);
        }
    }

    /// Consumes an expiry signal. Returns `false` for signals from a timer
    /// which has since been cancelled or re-armed.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.armed {
            Some(armed) if armed.generation == generation => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn expiry(event: Option<AppEvent>) -> u64 {
        match event {
            Some(AppEvent::Notification(_, NotificationEvent::TimerExpired(g))) => g,
            other => panic!("expected timer expiry, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_duration() {
        let (sender, mut receiver) = mpsc::channel(8);
        let mut timer = DismissTimer::new(NotificationId::new(), sender);
        let start = Instant::now();

        timer.arm(Duration::from_millis(500));
        assert!(timer.is_armed());

        let generation = expiry(receiver.recv().await);
        assert_eq!(Duration::from_millis(500), start.elapsed());
        assert!(timer.expire(generation));
        assert!(!timer.is_armed());

        // a second expiry of the same generation is stale
        assert!(!timer.expire(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_previous_timer() {
        let (sender, mut receiver) = mpsc::channel(8);
        let mut timer = DismissTimer::new(NotificationId::new(), sender);
        let start = Instant::now();

        timer.arm(Duration::from_millis(300));
        tokio::time::sleep(Duration::from_millis(100)).await;
        timer.arm(Duration::from_millis(300));

        let generation = expiry(receiver.recv().await);
        assert_eq!(Duration::from_millis(400), start.elapsed());
        assert_eq!(2, generation);
        assert!(timer.expire(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let (sender, mut receiver) = mpsc::channel(8);
        let mut timer = DismissTimer::new(NotificationId::new(), sender);

        timer.arm(Duration::from_millis(100));
        timer.cancel();
        assert!(!timer.is_armed());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(receiver.try_recv().is_err());
        assert!(!timer.expire(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (sender, mut receiver) = mpsc::channel(8);
        let mut timer = DismissTimer::new(NotificationId::new(), sender);
        timer.arm(Duration::from_millis(100));
        drop(timer);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(receiver.try_recv().is_err());
    }
}
