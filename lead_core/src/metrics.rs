//! Submission metrics collection and reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Clone)]
pub struct MetricsCollector {
    submissions_received: Arc<AtomicU64>,
    submissions_accepted: Arc<AtomicU64>,
    submissions_rejected: Arc<AtomicU64>,
    submissions_rate_limited: Arc<AtomicU64>,
    emails_sent: Arc<AtomicU64>,
    emails_failed: Arc<AtomicU64>,
    start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub submissions_received: u64,
    pub submissions_accepted: u64,
    pub submissions_rejected: u64,
    pub submissions_rate_limited: u64,
    pub emails_sent: u64,
    pub emails_failed: u64,
    pub uptime_seconds: i64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            submissions_received: Arc::new(AtomicU64::new(0)),
            submissions_accepted: Arc::new(AtomicU64::new(0)),
            submissions_rejected: Arc::new(AtomicU64::new(0)),
            submissions_rate_limited: Arc::new(AtomicU64::new(0)),
            emails_sent: Arc::new(AtomicU64::new(0)),
            emails_failed: Arc::new(AtomicU64::new(0)),
            start_time: Utc::now(),
        }
    }

    pub fn record_received(&self) {
        self.submissions_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accepted(&self) {
        self.submissions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.submissions_rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_email_sent(&self) {
        self.emails_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_email_failed(&self) {
        self.emails_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let uptime = Utc::now().signed_duration_since(self.start_time);

        MetricsSnapshot {
            submissions_received: self.submissions_received.load(Ordering::Relaxed),
            submissions_accepted: self.submissions_accepted.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
            submissions_rate_limited: self.submissions_rate_limited.load(Ordering::Relaxed),
            emails_sent: self.emails_sent.load(Ordering::Relaxed),
            emails_failed: self.emails_failed.load(Ordering::Relaxed),
            uptime_seconds: uptime.num_seconds().max(0),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
