use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WidgetsSettings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub endpoints: EndpointSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub host: HostSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
    pub chart_library_url: String,
    /// Unset means requests may hang and leave widgets loading.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8069".to_string(),
            chart_library_url: "/web/static/lib/Chart/Chart.js".to_string(),
            request_timeout_secs: Some(30),
        }
    }
}

impl ServerSettings {
    /// `0` disables the timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Endpoint paths. Customer paths carry a `${customer_id}` placeholder.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EndpointSettings {
    pub chart_data: String,
    pub customer_stats: String,
    pub recent_repairs: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            chart_data: "/repair/dashboard/chart_data".to_string(),
            customer_stats: "/repair/customer/${customer_id}/stats".to_string(),
            recent_repairs: "/repair/customer/${customer_id}/recent_repairs".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingSettings {
    pub initial_delay_ms: u64,
    pub refresh_debounce_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            refresh_debounce_ms: 500,
        }
    }
}

impl TimingSettings {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HostSettings {
    pub bind: String,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Load `config/widgets.*` (optional) with `WIDGETS__SECTION__KEY` overrides.
pub fn load_widgets_settings() -> anyhow::Result<WidgetsSettings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets").required(false))
        .add_source(config::Environment::with_prefix("WIDGETS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a path template
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
