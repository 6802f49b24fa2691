//! Reconnection coordinator: drives a network teardown to completion.
//!
//! A handler that changes how the node connects starts a teardown and does
//! not return until the old session is gone. The wait yields to the runtime
//! between polls instead of spinning.

use std::fmt;

use crate::ports::{Teardown, TeardownStatus};

/// Which link a configuration change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The transport session to the server or multicast group.
    Session,
    /// The WiFi association itself.
    Wifi,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Session => "session",
            Self::Wifi => "wifi",
        })
    }
}

/// Poll `token` until it reports completion, yielding between polls.
///
/// Returns the number of polls it took.
#[tracing::instrument(skip(token))]
pub async fn wait_for_teardown(link: Link, mut token: Box<dyn Teardown>) -> usize {
    tracing::info!("teardown started");
    let mut polls = 1;
    while token.poll() == TeardownStatus::InProgress {
        tokio::task::yield_now().await;
        polls += 1;
    }
    tracing::info!(polls, "teardown complete");
    polls
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Countdown {
        remaining: usize,
        polls: Arc<AtomicUsize>,
    }

    impl Teardown for Countdown {
        fn poll(&mut self) -> TeardownStatus {
            self.polls.fetch_add(1, Ordering::SeqCst);
            if self.remaining == 0 {
                TeardownStatus::Complete
            } else {
                self.remaining -= 1;
                TeardownStatus::InProgress
            }
        }
    }

    #[tokio::test]
    async fn should_poll_until_complete() {
        let polls = Arc::new(AtomicUsize::new(0));
        let token = Box::new(Countdown {
            remaining: 5,
            polls: Arc::clone(&polls),
        });

        let count = wait_for_teardown(Link::Wifi, token).await;

        assert_eq!(count, 6);
        assert_eq!(polls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn should_poll_once_when_already_complete() {
        let polls = Arc::new(AtomicUsize::new(0));
        let token = Box::new(Countdown {
            remaining: 0,
            polls: Arc::clone(&polls),
        });

        assert_eq!(wait_for_teardown(Link::Session, token).await, 1);
    }

    #[test]
    fn should_display_link_names() {
        assert_eq!(Link::Session.to_string(), "session");
        assert_eq!(Link::Wifi.to_string(), "wifi");
    }
}
