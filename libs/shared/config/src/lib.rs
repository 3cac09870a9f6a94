use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_QR_DEBOUNCE_MS: u64 = 1500;
pub const DEFAULT_QR_AUTO_CLOSE_MS: u64 = 500;
pub const DEFAULT_QR_SCAN_INTERVAL_MS: u64 = 250;
pub const DEFAULT_SPECIALTY_PAGE_SIZE: u32 = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub qr_debounce_ms: u64,
    pub qr_auto_close_ms: u64,
    pub qr_scan_interval_ms: u64,
    pub specialty_page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            api_token: String::new(),
            qr_debounce_ms: DEFAULT_QR_DEBOUNCE_MS,
            qr_auto_close_ms: DEFAULT_QR_AUTO_CLOSE_MS,
            qr_scan_interval_ms: DEFAULT_QR_SCAN_INTERVAL_MS,
            specialty_page_size: DEFAULT_SPECIALTY_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and then read the process environment.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("CLINIC_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_URL not set, using empty value");
                    String::new()
                }),
            api_token: env::var("CLINIC_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_TOKEN not set, requests will be anonymous");
                    String::new()
                }),
            qr_debounce_ms: parse_or_default("QR_DEBOUNCE_MS", DEFAULT_QR_DEBOUNCE_MS),
            qr_auto_close_ms: parse_or_default("QR_AUTO_CLOSE_MS", DEFAULT_QR_AUTO_CLOSE_MS),
            qr_scan_interval_ms: parse_or_default("QR_SCAN_INTERVAL_MS", DEFAULT_QR_SCAN_INTERVAL_MS),
            specialty_page_size: parse_or_default("SPECIALTY_PAGE_SIZE", DEFAULT_SPECIALTY_PAGE_SIZE),
            request_timeout_secs: parse_or_default("CLINIC_API_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        if !config.is_configured() {
            warn!("Clinic client not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    pub fn has_token(&self) -> bool {
        !self.api_token.is_empty()
    }

    pub fn qr_debounce_window(&self) -> Duration {
        Duration::from_millis(self.qr_debounce_ms)
    }

    pub fn qr_auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.qr_auto_close_ms)
    }

    pub fn qr_scan_interval(&self) -> Duration {
        // A zero interval would spin the scanner loop
        Duration::from_millis(self.qr_scan_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_timings() {
        let config = AppConfig::default();

        assert_eq!(config.qr_debounce_window(), Duration::from_millis(1500));
        assert_eq!(config.qr_auto_close_delay(), Duration::from_millis(500));
        assert_eq!(config.specialty_page_size, 50);
        assert!(!config.is_configured());
    }

    #[test]
    fn scan_interval_never_zero() {
        let config = AppConfig {
            qr_scan_interval_ms: 0,
            ..AppConfig::default()
        };

        assert_eq!(config.qr_scan_interval(), Duration::from_millis(1));
    }
}
