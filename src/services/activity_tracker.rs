use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// Sessions idle for longer than this are considered gone.
pub const SESSION_TTL_MS: i64 = 5 * 60 * 1000;

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Best-effort map of user id to last-seen time, used only for the
/// "active users" display metric.
///
/// State lives in this process only: a restart or a second instance yields
/// an independent, partial count. Entries are pruned lazily on `touch` —
/// there is no background timer.
pub struct ActivityTracker {
    clock: Clock,
    sessions: RwLock<HashMap<String, i64>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::with_clock(Box::new(|| Utc::now().timestamp_millis()))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Records activity for the user and prunes entries past the TTL.
    pub fn touch(&self, user_id: &str) {
        let now = (self.clock)();

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(user_id.to_string(), now);
            sessions.retain(|_, last_seen| now - *last_seen <= SESSION_TTL_MS);
        }
    }

    /// Number of users seen within the TTL. Read-only; expired entries are
    /// excluded from the count even before the next `touch` prunes them.
    pub fn active_count(&self) -> usize {
        let now = (self.clock)();

        self.sessions
            .read()
            .map(|sessions| {
                sessions
                    .values()
                    .filter(|last_seen| now - **last_seen <= SESSION_TTL_MS)
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
