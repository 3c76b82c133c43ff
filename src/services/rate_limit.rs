// src/services/rate_limit.rs
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub authenticated_limit: u32,
    pub anonymous_limit: u32,
    pub per_ip_limit: u32,
    pub window_seconds: u32,
    pub whitelist_ips: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            authenticated_limit: 100, // 100 requests per minute for authenticated users
            anonymous_limit: 20,      // 20 requests per minute for anonymous users
            per_ip_limit: 50,         // 50 requests per minute per IP
            window_seconds: 60,       // 60 second window
            whitelist_ips: vec!["127.0.0.1".to_string(), "::1".to_string()],
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // RATE_LIMIT_ENABLED - set to "false" to disable rate limiting
        if let Ok(enabled) = env::var("RATE_LIMIT_ENABLED") {
            config.enabled = enabled.to_lowercase() != "false";
        }

        if let Ok(limit) = env::var("RATE_LIMIT_AUTHENTICATED") {
            if let Ok(val) = limit.parse::<u32>() {
                config.authenticated_limit = val;
            }
        }

        if let Ok(limit) = env::var("RATE_LIMIT_ANONYMOUS") {
            if let Ok(val) = limit.parse::<u32>() {
                config.anonymous_limit = val;
            }
        }

        if let Ok(limit) = env::var("RATE_LIMIT_PER_IP") {
            if let Ok(val) = limit.parse::<u32>() {
                config.per_ip_limit = val;
            }
        }

        if let Ok(window) = env::var("RATE_LIMIT_WINDOW_SECONDS") {
            if let Ok(val) = window.parse::<u32>() {
                config.window_seconds = val;
            }
        }

        // RATE_LIMIT_WHITELIST_IPS - comma-separated list of whitelisted IPs
        if let Ok(whitelist) = env::var("RATE_LIMIT_WHITELIST_IPS") {
            config.whitelist_ips = whitelist
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }
}

#[derive(Debug, Clone)]
struct RateLimitState {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    fn new() -> Self {
        Self {
            count: 1,
            window_start: Instant::now(),
        }
    }

    fn increment(&mut self) {
        self.count += 1;
    }

    fn reset(&mut self) {
        self.count = 1;
        self.window_start = Instant::now();
    }

    fn is_expired(&self, window_duration: Duration) -> bool {
        self.window_start.elapsed() > window_duration
    }
}

#[derive(Debug)]
pub enum RateLimitResult {
    Allowed,
    Limited { retry_after: u32 },
}

/// Fixed-window in-memory rate limiter, keyed per identifier and per IP.
///
/// Configuration is resolved once at startup from the environment; there
/// is no settings store behind it.
#[derive(Debug, Clone)]
pub struct RateLimitService {
    config: RateLimitConfig,
    rate_limiter: Arc<RwLock<HashMap<String, RateLimitState>>>,
}

impl RateLimitService {
    pub fn new() -> Self {
        let config = RateLimitConfig::from_env();
        info!(
            enabled = config.enabled,
            authenticated_limit = config.authenticated_limit,
            anonymous_limit = config.anonymous_limit,
            per_ip_limit = config.per_ip_limit,
            window_seconds = config.window_seconds,
            whitelist_ips = ?config.whitelist_ips,
            "Initializing RateLimitService"
        );
        Self {
            config,
            rate_limiter: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check if an IP is whitelisted
    fn is_whitelisted(&self, ip: &str) -> bool {
        self.config
            .whitelist_ips
            .iter()
            .any(|whitelisted_ip| whitelisted_ip == ip)
    }

    /// Check rate limit for a given identifier
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        ip_address: Option<&str>,
        is_authenticated: bool,
    ) -> RateLimitResult {
        if !self.config.enabled {
            return RateLimitResult::Allowed;
        }

        if let Some(ip) = ip_address {
            if self.is_whitelisted(ip) {
                return RateLimitResult::Allowed;
            }
        }

        let limit = if is_authenticated {
            self.config.authenticated_limit
        } else {
            self.config.anonymous_limit
        };

        let window_duration = Duration::from_secs(self.config.window_seconds as u64);

        // Identifier limit first, then the per-IP limit
        if let RateLimitResult::Limited { retry_after } = self
            .check_limit_for_key(identifier, limit, window_duration)
            .await
        {
            return RateLimitResult::Limited { retry_after };
        }

        if let Some(ip) = ip_address {
            let ip_key = format!("ip:{}", ip);
            if let RateLimitResult::Limited { retry_after } = self
                .check_limit_for_key(&ip_key, self.config.per_ip_limit, window_duration)
                .await
            {
                return RateLimitResult::Limited { retry_after };
            }
        }

        RateLimitResult::Allowed
    }

    /// Internal method to check rate limit for a specific key
    async fn check_limit_for_key(
        &self,
        key: &str,
        limit: u32,
        window_duration: Duration,
    ) -> RateLimitResult {
        let mut limiter = self.rate_limiter.write().await;

        let state = limiter
            .entry(key.to_string())
            .or_insert_with(RateLimitState::new);

        if state.is_expired(window_duration) {
            state.reset();
            return RateLimitResult::Allowed;
        }

        if state.count >= limit {
            let elapsed = state.window_start.elapsed().as_secs() as u32;
            let retry_after = window_duration.as_secs() as u32 - elapsed;
            return RateLimitResult::Limited { retry_after };
        }

        state.increment();
        RateLimitResult::Allowed
    }

    /// Log a rate limit violation
    pub fn log_violation(&self, identifier: &str, ip_address: Option<&str>, endpoint: &str) {
        warn!(
            identifier = %identifier,
            ip_address = ?ip_address,
            endpoint = %endpoint,
            "Rate limit violation detected"
        );
    }

    /// Clean up expired entries (should be called periodically)
    pub async fn cleanup_expired(&self) {
        let window_duration = Duration::from_secs(self.config.window_seconds as u64);
        let mut limiter = self.rate_limiter.write().await;
        limiter.retain(|_, state| !state.is_expired(window_duration));
        info!("Cleaned up expired rate limit entries");
    }
}

impl Default for RateLimitService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with(config: RateLimitConfig) -> RateLimitService {
        RateLimitService {
            config,
            rate_limiter: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            authenticated_limit: 5,
            anonymous_limit: 2,
            per_ip_limit: 4,
            window_seconds: 60,
            whitelist_ips: vec!["127.0.0.1".to_string()],
        }
    }

    #[tokio::test]
    async fn test_rate_limit_allows_within_limit() {
        let service = service_with(test_config());

        let result = service
            .check_rate_limit("user123", Some("192.168.1.1"), true)
            .await;
        assert!(matches!(result, RateLimitResult::Allowed));
    }

    #[tokio::test]
    async fn test_rate_limit_blocks_when_exceeded() {
        let service = service_with(test_config());

        for _ in 0..5 {
            service
                .check_rate_limit("user-exceeds", Some("192.168.50.1"), true)
                .await;
        }

        let result = service
            .check_rate_limit("user-exceeds", Some("192.168.50.1"), true)
            .await;
        assert!(matches!(result, RateLimitResult::Limited { .. }));
    }

    #[tokio::test]
    async fn test_whitelist_bypasses_rate_limit() {
        let service = service_with(test_config());

        for _ in 0..20 {
            let result = service
                .check_rate_limit("user123", Some("127.0.0.1"), true)
                .await;
            assert!(matches!(result, RateLimitResult::Allowed));
        }
    }

    #[tokio::test]
    async fn test_different_users_have_separate_limits() {
        let service = service_with(test_config());

        for _ in 0..5 {
            service
                .check_rate_limit("user1", Some("192.168.1.1"), true)
                .await;
        }

        let result = service
            .check_rate_limit("user2", Some("192.168.1.2"), true)
            .await;
        assert!(matches!(result, RateLimitResult::Allowed));
    }

    #[tokio::test]
    async fn test_anonymous_limit_is_tighter() {
        let service = service_with(test_config());

        for _ in 0..2 {
            service
                .check_rate_limit("anon:10.1.1.1", None, false)
                .await;
        }

        let result = service.check_rate_limit("anon:10.1.1.1", None, false).await;
        assert!(matches!(result, RateLimitResult::Limited { .. }));
    }

    #[tokio::test]
    async fn test_disabled_limiter_allows_everything() {
        let mut config = test_config();
        config.enabled = false;
        let service = service_with(config);

        for _ in 0..100 {
            let result = service
                .check_rate_limit("user123", Some("10.9.9.9"), false)
                .await;
            assert!(matches!(result, RateLimitResult::Allowed));
        }
    }
}
