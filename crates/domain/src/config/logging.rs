use serde::{Deserialize, Serialize};

const CRATE_TARGETS: &[&str] = &[
    "bucketwire",
    "bucketwire_application",
    "bucketwire_infrastructure",
    "bucketwire_jobs",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Filter directive handed to the subscriber when `RUST_LOG` is unset.
    /// Dependencies stay at `warn`.
    pub fn filter_directive(&self) -> String {
        let level = self.level.to_lowercase();
        let mut directive = String::from("warn");
        for target in CRATE_TARGETS {
            directive.push_str(&format!(",{target}={level}"));
        }
        directive
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
