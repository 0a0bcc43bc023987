use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "homelab-api")]
#[command(about = "Home lab API service")]
pub struct Args {
    /// Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Max requests per client per window
    #[arg(long, env = "RATE_LIMIT", default_value_t = 500)]
    pub rate_limit: u32,

    /// Rate limit window in minutes
    #[arg(long, env = "RATE_WINDOW_MINUTES", default_value_t = 1.0)]
    pub rate_window_minutes: f64,

    /// Use X-Forwarded-For / X-Real-IP as the client address
    #[arg(long, env = "TRUST_PROXY_HEADERS", default_value_t = false)]
    pub trust_proxy_headers: bool,

    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Args {
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.rate_limit,
            window_minutes: self.rate_window_minutes,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

// shortest window whose reset hint still rounds to 1s
pub const MIN_WINDOW_SECS: f64 = 0.5;

/// `max_requests` allowed per `window_minutes`, refilled continuously.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_minutes: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 500,
            window_minutes: 1.0,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(Error::InvalidConfig(
                "max_requests must be greater than 0".to_string(),
            ));
        }
        if !self.window_minutes.is_finite() || self.window_minutes <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "window_minutes must be a positive number, got {}",
                self.window_minutes
            )));
        }
        // the reset hint is whole seconds and must not round down to 0
        if self.window_secs() < MIN_WINDOW_SECS {
            return Err(Error::InvalidConfig(format!(
                "rate window must be at least {}s, got {}s",
                MIN_WINDOW_SECS,
                self.window_secs()
            )));
        }
        let rate = self.refill_rate_per_second();
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "refill rate must be a positive number, got {}",
                rate
            )));
        }
        Ok(())
    }

    pub fn window_secs(&self) -> f64 {
        self.window_minutes * 60.0
    }

    pub fn refill_rate_per_second(&self) -> f64 {
        self.max_requests as f64 / self.window_secs()
    }

    pub fn reset_hint_secs(&self) -> u64 {
        self.window_secs().round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["homelab-api"]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.rate_limit, 500);
        assert_eq!(args.rate_window_minutes, 1.0);
        assert!(!args.trust_proxy_headers);
        assert_eq!(args.shutdown_timeout, 30);
        assert_eq!(args.log_format, LogFormat::Text);
        assert_eq!(args.rate_limit_config(), RateLimitConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let args = Args::try_parse_from([
            "homelab-api",
            "--port",
            "9000",
            "--rate-limit",
            "100",
            "--rate-window-minutes",
            "2",
            "--trust-proxy-headers",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.bind_addr(), "0.0.0.0:9000");
        assert!(args.trust_proxy_headers);
        assert_eq!(args.log_format, LogFormat::Json);

        let config = args.rate_limit_config();
        assert_eq!(config.max_requests, 100);
        assert!((config.refill_rate_per_second() - 100.0 / 120.0).abs() < 0.001);
        assert_eq!(config.reset_hint_secs(), 120);
    }

    fn config(max_requests: u32, window_minutes: f64) -> RateLimitConfig {
        RateLimitConfig {
            max_requests,
            window_minutes,
        }
    }

    #[test]
    fn test_validate() {
        assert!(RateLimitConfig::default().validate().is_ok());
        assert!(config(0, 1.0).validate().is_err());
        assert!(config(10, 0.0).validate().is_err());
        assert!(config(10, -1.0).validate().is_err());
        assert!(config(10, f64::INFINITY).validate().is_err());
        assert!(config(10, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_tiny_window_is_rejected() {
        // 10 per 1e-310 minutes would refill at an infinite rate
        let tiny = config(10, 1e-310);
        assert!(!tiny.refill_rate_per_second().is_finite());
        assert!(tiny.validate().is_err());

        // just under half a second rounds the reset hint to 0
        assert!(config(10, 0.49 / 60.0).validate().is_err());
        let one_second = config(10, 1.0 / 60.0);
        assert!(one_second.validate().is_ok());
        assert_eq!(one_second.reset_hint_secs(), 1);
    }

    #[test]
    fn test_fractional_window() {
        let half_minute = config(10, 0.5);
        assert_eq!(half_minute.reset_hint_secs(), 30);
        assert!((half_minute.refill_rate_per_second() - 10.0 / 30.0).abs() < 1e-9);
    }
}
