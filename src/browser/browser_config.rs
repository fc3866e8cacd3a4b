use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Browser launch configuration
// ============================================================================

/// Chromium flags applied to every launch, headless or not.
const STABILITY_FLAGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-component-update",
    "--disable-domain-reliability",
    "--disable-extensions",
    "--disable-hang-monitor",
    "--disable-ipc-flooding-protection",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-prompt-on-repost",
    "--disable-renderer-backgrounding",
    "--disable-sync",
    "--hide-scrollbars",
    "--metrics-recording-only",
    "--mute-audio",
    "--no-default-browser-check",
    "--no-first-run",
    "--password-store=basic",
    "--use-mock-keychain",
];

/// Run profile: how patient the browser is with slow pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Fast,
    Pro,
}

impl Profile {
    pub fn page_load_timeout(&self) -> Duration {
        match self {
            Profile::Fast => Duration::from_secs(30),
            Profile::Pro => Duration::from_secs(180),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Fast => "fast",
            Profile::Pro => "pro",
        }
    }
}

/// How the browser session is launched.
///
/// Fixed at construction time; the session never changes its behavior
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// Maximum time a page load may take
    #[serde(with = "duration_secs")]
    pub page_load_timeout: Duration,

    /// Viewport size as (width, height)
    pub window_size: (u32, u32),

    /// Node.js executable used to run the bridge
    pub node_path: String,

    /// Bridge script driving the real browser
    pub bridge_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            page_load_timeout: Duration::from_secs(30),
            window_size: (1920, 1080),
            node_path: "node".to_string(),
            bridge_script: "bridge/browser_bridge.js".to_string(),
        }
    }
}

impl BrowserConfig {
    /// Defaults with the profile's page-load timeout.
    pub fn for_profile(profile: Profile, headless: bool) -> Self {
        Self {
            headless,
            page_load_timeout: profile.page_load_timeout(),
            ..Self::default()
        }
    }

    /// Chromium command-line arguments derived from this config.
    pub fn chromium_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(STABILITY_FLAGS.len() + 2);
        if self.headless {
            args.push("--headless".to_string());
        }
        args.extend(STABILITY_FLAGS.iter().map(|f| f.to_string()));
        args.push(format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        ));
        args
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
