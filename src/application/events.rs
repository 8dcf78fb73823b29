use crate::constants::NOTIFICATION_CHANNEL_CAPACITY;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

/// Change events published by the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The feed's photo list grew or a photo's liked flag changed.
    FeedChanged,
    /// A new avatar URL is known for the signed-in user.
    AvatarChanged(String),
    /// The session was torn down; the unauthenticated entry screen should be shown.
    LoggedOut,
}

/// Typed publish/subscribe hub shared by the services and the presentation layer.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    sender: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Delivers `notification` to every live subscription. Having none is fine.
    pub fn publish(&self, notification: Notification) {
        match self.sender.send(notification) {
            Ok(count) => debug!("Notification delivered to {} subscriber(s)", count),
            Err(broadcast::error::SendError(notification)) => {
                debug!("No subscribers for {:?}", notification)
            }
        }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

/// A live registration on a [`NotificationCenter`].
///
/// Dropping it unsubscribes; [`Subscription::unsubscribe`] makes that explicit.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
}

impl Subscription {
    /// Waits for the next notification. `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) => return Some(notification),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscriber lagged, {} notification(s) skipped", skipped)
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next notification if one is already queued.
    pub fn try_recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.try_recv() {
                Ok(notification) => return Some(notification),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Subscriber lagged, {} notification(s) skipped", skipped)
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}
