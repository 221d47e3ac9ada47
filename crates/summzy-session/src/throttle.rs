//! Sliding-window limit on AI requests by non-admin users.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use summzy_config::ThrottleConfig;

/// Outcome of [`Throttle::check`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allowed,
    /// The user must wait `retry_after` before the oldest request leaves the window.
    Limited { retry_after: Duration },
}

/// Requests of one user still inside the window.
struct Window {
    timestamps: VecDeque<Instant>,
    last_updated: Instant,
}

/// Thread-safe per-user request throttle.
///
/// Admins are never limited. Callers `check` before doing work and `record`
/// once the work was done, so failed requests don't count.
pub struct Throttle {
    windows: Mutex<HashMap<u64, Window>>,
    limit: usize,
    window: Duration,
    max_tracked_users: usize,
}

impl Throttle {
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            limit: config.limit,
            window: config.window(),
            max_tracked_users: config.max_tracked_users,
        }
    }

    /// Decide whether `user_id` may make another request at `now`.
    pub fn check(&self, user_id: u64, is_admin: bool, now: Instant) -> ThrottleDecision {
        if is_admin {
            return ThrottleDecision::Allowed;
        }

        let mut windows = self.windows.lock().unwrap();
        self.prune_expired(&mut windows, now);

        let Some(entry) = windows.get(&user_id) else {
            return ThrottleDecision::Allowed;
        };
        if entry.timestamps.len() < self.limit {
            return ThrottleDecision::Allowed;
        }

        let oldest = entry.timestamps.front().copied().unwrap_or(now);
        let retry_after = self
            .window
            .saturating_sub(now.saturating_duration_since(oldest));
        ThrottleDecision::Limited { retry_after }
    }

    /// Count a completed request by `user_id` at `now`.
    pub fn record(&self, user_id: u64, now: Instant) {
        let mut windows = self.windows.lock().unwrap();
        self.prune_expired(&mut windows, now);

        let entry = windows.entry(user_id).or_insert_with(|| Window {
            timestamps: VecDeque::new(),
            last_updated: now,
        });
        entry.timestamps.push_back(now);
        entry.last_updated = now;

        self.evict_overflow(&mut windows);
    }

    /// Forget one user's requests, or everyone's with `None`.
    pub fn reset(&self, user_id: Option<u64>) {
        let mut windows = self.windows.lock().unwrap();
        match user_id {
            Some(id) => {
                windows.remove(&id);
            }
            None => windows.clear(),
        }
    }

    /// Number of users with requests inside the window.
    pub fn tracked_users(&self) -> usize {
        self.windows.lock().unwrap().len()
    }

    /// User-facing explanation of a limit.
    ///
    /// Minutes are rounded up and never shown as zero.
    pub fn limit_message(&self, retry_after: Duration) -> String {
        let minutes = retry_after.as_millis().div_ceil(60_000).max(1);
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        format!(
            "AI message limit reached for non-admin users ({} per {}). Try again in about {minutes} {unit}.",
            self.limit,
            describe_window(self.window)
        )
    }

    /// Drop timestamps that left the window, and users left with none.
    fn prune_expired(&self, windows: &mut HashMap<u64, Window>, now: Instant) {
        windows.retain(|_, entry| {
            while entry
                .timestamps
                .front()
                .is_some_and(|&at| now.saturating_duration_since(at) >= self.window)
            {
                entry.timestamps.pop_front();
            }
            match entry.timestamps.back() {
                Some(&last) => {
                    entry.last_updated = last;
                    true
                }
                None => false,
            }
        });
    }

    /// Forget the least recently active users beyond the tracking limit.
    fn evict_overflow(&self, windows: &mut HashMap<u64, Window>) {
        if windows.len() <= self.max_tracked_users {
            return;
        }

        let mut by_age: Vec<(u64, Instant)> = windows
            .iter()
            .map(|(id, entry)| (*id, entry.last_updated))
            .collect();
        by_age.sort_by_key(|&(_, at)| at);

        let excess = windows.len() - self.max_tracked_users;
        for (id, _) in by_age.into_iter().take(excess) {
            windows.remove(&id);
        }
        tracing::debug!(evicted = excess, "Evicted least recently active throttle windows");
    }
}

fn describe_window(window: Duration) -> String {
    let secs = window.as_secs();
    match secs {
        3600 => "hour".to_owned(),
        60 => "minute".to_owned(),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{s} seconds"),
    }
}
