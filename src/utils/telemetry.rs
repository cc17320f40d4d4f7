// file: src/utils/telemetry.rs
// description: component health reporting and stage timing
// reference: backs the `status` command and per-stage debug timings

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Health status for the feed endpoint and the model engines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthCheck {
    pub fn healthy(component: &str, message: Option<String>, response_time: Duration) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Healthy,
            message,
            response_time_ms: response_time.as_millis() as u64,
        }
    }

    pub fn degraded(component: &str, message: String, response_time: Duration) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Degraded,
            message: Some(message),
            response_time_ms: response_time.as_millis() as u64,
        }
    }

    pub fn unhealthy(component: &str, message: String, response_time: Duration) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(message),
            response_time_ms: response_time.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: i64,
    pub version: String,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>, version: String) -> Self {
        let overall_status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            overall_status,
            checks,
            timestamp: chrono::Utc::now().timestamp(),
            version,
        }
    }

    pub fn format(&self) -> String {
        let mut output = format!(
            "{} System Health: {:?}\n\
             Version: {}\n\
             Timestamp: {}\n\n",
            self.overall_status.icon(),
            self.overall_status,
            self.version,
            chrono::DateTime::from_timestamp(self.timestamp, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        for check in &self.checks {
            output.push_str(&format!(
                "{} {} ({:?}) - {}ms",
                check.status.icon(),
                check.component,
                check.status,
                check.response_time_ms
            ));

            if let Some(ref msg) = check.message {
                output.push_str(&format!("\n  {}", msg));
            }

            output.push('\n');
        }

        output
    }
}

/// Times one pipeline stage and logs the duration at debug level
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Starting stage: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        debug!(
            "Completed stage: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        debug!(
            "Completed stage: {} ({} items) in {:.2}s",
            self.operation,
            count,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Stage {} is slow: {:.2}s (threshold {:.2}s)",
                self.operation,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_creation() {
        let check = HealthCheck::healthy("encoder", None, Duration::from_millis(50));
        assert_eq!(check.component, "encoder");
        assert_eq!(check.status, HealthStatus::Healthy);
        assert_eq!(check.response_time_ms, 50);
    }

    #[test]
    fn test_health_report_overall_status() {
        let checks = vec![
            HealthCheck::healthy("feed", None, Duration::from_millis(10)),
            HealthCheck::degraded(
                "summarizer",
                "no API key".to_string(),
                Duration::from_millis(1),
            ),
        ];

        let report = HealthReport::new(checks, "0.1.0".to_string());
        assert_eq!(report.overall_status, HealthStatus::Degraded);

        let formatted = report.format();
        assert!(formatted.contains("summarizer"));
        assert!(formatted.contains("no API key"));
    }

    #[test]
    fn test_unhealthy_dominates() {
        let checks = vec![
            HealthCheck::degraded("encoder", "slow".to_string(), Duration::ZERO),
            HealthCheck::unhealthy("feed", "dns".to_string(), Duration::ZERO),
        ];
        let report = HealthReport::new(checks, "0.1.0".to_string());
        assert_eq!(report.overall_status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("fetch");
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.finish();
        assert!(elapsed >= Duration::from_millis(10));
    }
}
