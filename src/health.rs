use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::HealthStatus;

// Tracks process uptime and reports component status
pub struct HealthChecker {
    start_time: Instant,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn check(&self) -> HealthStatus {
        let mut components = HashMap::new();
        components.insert("api_server".to_string(), "healthy".to_string());

        HealthStatus {
            status: "healthy".to_string(),
            uptime: format_uptime(self.uptime()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            components,
        }
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Human readable uptime, e.g. `1d 2h 3m 4s`. Leading zero units are dropped.
pub fn format_uptime(d: Duration) -> String {
    let total = d.as_secs();
    let days = total / 86_400;
    let hours = (total / 3_600) % 24;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
