//! User-visible notices: short-lived messages and the connection banner.
//!
//! Transient notices (server errors, rejected actions, selection limits)
//! expire after a fixed lifetime. The "connection lost" banner does not:
//! once the session's transport is gone it stays until the view is left.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// What the renderer shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Set for the banner, which never expires.
    pub persistent: bool,
}

#[derive(Debug, Clone)]
struct Timed {
    text: String,
    expires_at: Instant,
}

/// The current set of notices.
#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    transient: VecDeque<Timed>,
    banner: Option<String>,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            transient: VecDeque::new(),
            banner: None,
        }
    }

    /// Shows `text` until `now + ttl`.
    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.transient.push_back(Timed {
            text: text.into(),
            expires_at: now + self.ttl,
        });
    }

    /// Sets the persistent banner, replacing any earlier one.
    pub fn set_banner(&mut self, text: impl Into<String>) {
        self.banner = Some(text.into());
    }

    /// Drops every transient notice due at or before `now`.
    ///
    /// Returns `true` if anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.transient.len();
        self.transient.retain(|n| n.expires_at > now);
        self.transient.len() != before
    }

    /// When the next transient notice is due, if any are up.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.transient.iter().map(|n| n.expires_at).min()
    }

    /// Banner first, then transient notices oldest first.
    pub fn current(&self) -> Vec<Notice> {
        let banner = self.banner.iter().map(|text| Notice {
            text: text.clone(),
            persistent: true,
        });
        let transient = self.transient.iter().map(|n| Notice {
            text: n.text.clone(),
            persistent: false,
        });
        banner.chain(transient).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.banner.is_none() && self.transient.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(notices: &Notices) -> Vec<String> {
        notices.current().into_iter().map(|n| n.text).collect()
    }

    #[test]
    fn test_transient_notice_expires_after_ttl() {
        let start = Instant::now();
        let mut notices = Notices::new(Duration::from_secs(3));
        notices.push("not your turn", start);

        assert!(!notices.expire(start + Duration::from_secs(2)));
        assert_eq!(texts(&notices), ["not your turn"]);

        assert!(notices.expire(start + Duration::from_secs(3)));
        assert!(notices.is_empty());
    }

    #[test]
    fn test_next_deadline_is_the_earliest() {
        let start = Instant::now();
        let mut notices = Notices::new(Duration::from_secs(3));
        assert_eq!(notices.next_deadline(), None);

        notices.push("a", start);
        notices.push("b", start + Duration::from_secs(1));
        assert_eq!(
            notices.next_deadline(),
            Some(start + Duration::from_secs(3))
        );
    }

    #[test]
    fn test_banner_survives_expiry_and_comes_first() {
        let start = Instant::now();
        let mut notices = Notices::new(Duration::from_millis(10));
        notices.push("rejected", start);
        notices.set_banner("connection lost");

        let current = notices.current();
        assert!(current[0].persistent);
        assert_eq!(current[0].text, "connection lost");
        assert!(!current[1].persistent);

        notices.expire(start + Duration::from_secs(60));
        assert_eq!(texts(&notices), ["connection lost"]);
        assert_eq!(notices.next_deadline(), None);
    }
}
