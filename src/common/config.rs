// src/common/config.rs
//! Startup environment validation
//!
//! The deployment contract requires a set of environment variables before
//! the service is allowed to boot. Missing variables are reported one per
//! line and the process exits with code 1.

use std::env;
use tracing::error;

/// Resolve the list of missing required variables using the given lookup.
///
/// The lookup is injected so the check can be tested without mutating
/// process-global environment state.
pub fn missing_required_vars<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();

    let require = |missing: &mut Vec<String>, key: &str| {
        match lookup(key) {
            Some(v) if !v.trim().is_empty() => {}
            _ => missing.push(key.to_string()),
        }
    };

    require(&mut missing, "OPENROUTER_API_KEY");

    // TTS credentials depend on the configured provider
    let tts_provider = lookup("TTS_PROVIDER")
        .unwrap_or_else(|| "elevenlabs".to_string())
        .to_lowercase();
    if tts_provider == "google" {
        require(&mut missing, "GOOGLE_APPLICATION_CREDENTIALS");
    } else {
        require(&mut missing, "TTS_PROVIDER_API_KEY");
    }

    require(&mut missing, "GOOGLE_CLIENT_ID");
    require(&mut missing, "GOOGLE_CLIENT_SECRET");

    missing
}

/// Validate the startup environment, exiting with code 1 when incomplete.
pub fn enforce_required_env() {
    let missing = missing_required_vars(|key| env::var(key).ok());

    if !missing.is_empty() {
        for key in &missing {
            error!(variable = %key, "Required environment variable is not set");
        }
        error!(
            missing_count = missing.len(),
            "Startup aborted: incomplete environment configuration"
        );
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_reports_every_missing_variable() {
        let env = HashMap::new();
        let missing = missing_required_vars(lookup_from(&env));

        assert!(missing.contains(&"OPENROUTER_API_KEY".to_string()));
        assert!(missing.contains(&"TTS_PROVIDER_API_KEY".to_string()));
        assert!(missing.contains(&"GOOGLE_CLIENT_ID".to_string()));
        assert!(missing.contains(&"GOOGLE_CLIENT_SECRET".to_string()));
    }

    #[test]
    fn test_complete_environment_passes() {
        let mut env = HashMap::new();
        env.insert("OPENROUTER_API_KEY", "or-key");
        env.insert("TTS_PROVIDER_API_KEY", "tts-key");
        env.insert("GOOGLE_CLIENT_ID", "client-id");
        env.insert("GOOGLE_CLIENT_SECRET", "client-secret");

        let missing = missing_required_vars(lookup_from(&env));
        assert!(missing.is_empty(), "unexpected missing: {:?}", missing);
    }

    #[test]
    fn test_google_tts_provider_switches_required_credential() {
        let mut env = HashMap::new();
        env.insert("OPENROUTER_API_KEY", "or-key");
        env.insert("TTS_PROVIDER", "google");
        env.insert("GOOGLE_CLIENT_ID", "client-id");
        env.insert("GOOGLE_CLIENT_SECRET", "client-secret");

        let missing = missing_required_vars(lookup_from(&env));
        assert_eq!(missing, vec!["GOOGLE_APPLICATION_CREDENTIALS".to_string()]);

        env.insert("GOOGLE_APPLICATION_CREDENTIALS", "/secrets/sa.json");
        let missing = missing_required_vars(lookup_from(&env));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut env = HashMap::new();
        env.insert("OPENROUTER_API_KEY", "   ");
        env.insert("TTS_PROVIDER_API_KEY", "tts-key");
        env.insert("GOOGLE_CLIENT_ID", "client-id");
        env.insert("GOOGLE_CLIENT_SECRET", "client-secret");

        let missing = missing_required_vars(lookup_from(&env));
        assert_eq!(missing, vec!["OPENROUTER_API_KEY".to_string()]);
    }
}
