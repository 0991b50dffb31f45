use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock seconds since the unix epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

/// Process-wide counters. Readable without taking the engine lock.
pub struct ServerStats {
    total_connections_received: AtomicU64,
    total_commands_processed: AtomicU64,
    // Unix seconds of the last successful snapshot, 0 if never.
    last_save: AtomicI64,
    started_at: i64,
}

impl ServerStats {
    pub fn new() -> ServerStats {
        ServerStats {
            total_connections_received: AtomicU64::new(0),
            total_commands_processed: AtomicU64::new(0),
            last_save: AtomicI64::new(0),
            started_at: unix_now(),
        }
    }

    pub fn connection_received(&self) {
        self.total_connections_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.total_commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save(&self, saved_at: i64) {
        self.last_save.store(saved_at, Ordering::Relaxed);
    }

    pub fn last_save(&self) -> i64 {
        self.last_save.load(Ordering::Relaxed)
    }

    pub fn total_connections_received(&self) -> u64 {
        self.total_connections_received.load(Ordering::Relaxed)
    }

    pub fn total_commands_processed(&self) -> u64 {
        self.total_commands_processed.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> i64 {
        unix_now() - self.started_at
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = ServerStats::new();

        stats.connection_received();
        stats.command_processed();
        stats.command_processed();

        assert_eq!(stats.total_connections_received(), 1);
        assert_eq!(stats.total_commands_processed(), 2);
    }

    #[test]
    fn last_save_defaults_to_zero() {
        let stats = ServerStats::new();
        assert_eq!(stats.last_save(), 0);

        stats.record_save(1234);
        assert_eq!(stats.last_save(), 1234);
    }
}
