//! Language code to locale profile lookup.

use tracing::debug;

use crate::profile::{LocaleProfile, ENGLISH, PORTUGUESE, SPANISH};

/// Fixed set of locale profiles with a designated default.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    profiles: Vec<LocaleProfile>,
    default: LocaleProfile,
}

impl LocaleRegistry {
    /// `en`, `pt` and `es`, defaulting to `pt`.
    pub fn builtin() -> Self {
        Self::with_profiles(PORTUGUESE, vec![ENGLISH, SPANISH])
    }

    /// Registry over `default` plus `others`. Later entries replace earlier
    /// ones with the same language code.
    pub fn with_profiles(default: LocaleProfile, others: Vec<LocaleProfile>) -> Self {
        let mut registry = Self {
            profiles: vec![default],
            default,
        };
        for profile in others {
            registry.register(profile);
        }
        registry
    }

    /// Add or replace a profile.
    pub fn register(&mut self, profile: LocaleProfile) {
        match self
            .profiles
            .iter_mut()
            .find(|p| p.language_code == profile.language_code)
        {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
        if self.default.language_code == profile.language_code {
            self.default = profile;
        }
    }

    /// Profile whose language code equals `language` exactly; anything else
    /// gets the default.
    pub fn resolve(&self, language: &str) -> LocaleProfile {
        self.lookup(language).unwrap_or_else(|| {
            debug!(language, default = self.default.language_code, "Unknown language, using default profile");
            self.default
        })
    }

    /// Like `resolve`, but ignores case and a region subtag, so `pt-BR`,
    /// `PT` and `pt` all match `pt`.
    pub fn resolve_loose(&self, language: &str) -> LocaleProfile {
        self.resolve(&normalize(language))
    }

    /// Whether `language` exactly names a profile.
    pub fn is_supported(&self, language: &str) -> bool {
        self.lookup(language).is_some()
    }

    fn lookup(&self, language: &str) -> Option<LocaleProfile> {
        self.profiles
            .iter()
            .find(|p| p.language_code == language)
            .copied()
    }

    /// The profile unknown codes resolve to.
    pub fn default_profile(&self) -> LocaleProfile {
        self.default
    }

    /// Language codes with a profile, in registration order.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.language_code).collect()
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(language: &str) -> String {
    language
        .trim()
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
