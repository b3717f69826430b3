use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const CONFIG_ENV_VAR: &str = "GTOUR_CONFIG_PATH";
const CONFIG_DIR: &str = "gtour";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub tour: TourConfig,
    pub scroll: ScrollConfig,
    pub inactivity: InactivityConfig,
    pub gate: GateConfig,
    pub page: PageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TourConfig {
    pub preroll_delay_ms: u64,
    pub hotspot_dwell_ms: u64,
    pub inter_step_gap_ms: u64,
    pub workflow_base_dwell_ms: u64,
    pub workflow_min_dwell_ms: u64,
    pub workflow_max_dwell_ms: u64,
    pub max_hotspot_steps: usize,
    pub finale_hold_ms: u64,
    pub finale_highlight_count: usize,
    pub finale_highlight_dwell_ms: u64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            preroll_delay_ms: 6_000,
            hotspot_dwell_ms: 7_000,
            inter_step_gap_ms: 3_000,
            workflow_base_dwell_ms: 4_000,
            workflow_min_dwell_ms: 4_000,
            workflow_max_dwell_ms: 15_000,
            max_hotspot_steps: 3,
            finale_hold_ms: 9_000,
            finale_highlight_count: 6,
            finale_highlight_dwell_ms: 2_000,
        }
    }
}

impl TourConfig {
    pub const HOTSPOT_DWELL_RANGE_MS: (u64, u64) = (6_000, 8_000);
    /// Every workflow dwell lands in this range whatever the configured bounds.
    pub const WORKFLOW_DWELL_RANGE_MS: (u64, u64) = (4_000, 15_000);

    pub fn preroll_delay(&self) -> Duration {
        Duration::from_millis(self.preroll_delay_ms)
    }

    pub fn hotspot_dwell(&self) -> Duration {
        Duration::from_millis(self.hotspot_dwell_ms)
    }

    pub fn inter_step_gap(&self) -> Duration {
        Duration::from_millis(self.inter_step_gap_ms)
    }

    pub fn finale_hold(&self) -> Duration {
        Duration::from_millis(self.finale_hold_ms)
    }

    pub fn finale_highlight_dwell(&self) -> Duration {
        Duration::from_millis(self.finale_highlight_dwell_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    pub section_scroll_ms: u64,
    pub scroll_ms_per_px: f64,
    pub finale_scroll_min_ms: u64,
    pub finale_scroll_max_ms: u64,
    pub return_scroll_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            section_scroll_ms: 4_000,
            scroll_ms_per_px: 2.0,
            finale_scroll_min_ms: 3_000,
            finale_scroll_max_ms: 6_000,
            return_scroll_ms: 3_500,
            frame_interval_ms: 16,
        }
    }
}

impl ScrollConfig {
    pub fn section_scroll(&self) -> Duration {
        Duration::from_millis(self.section_scroll_ms)
    }

    pub fn return_scroll(&self) -> Duration {
        Duration::from_millis(self.return_scroll_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InactivityConfig {
    pub inactivity_timeout_ms: u64,
    pub inactivity_poll_ms: u64,
}

impl Default for InactivityConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: 120_000,
            inactivity_poll_ms: 10_000,
        }
    }
}

impl InactivityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.inactivity_poll_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GateConfig {
    pub resume_grace_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            resume_grace_ms: 500,
        }
    }
}

impl GateConfig {
    pub const MAX_RESUME_GRACE_MS: u64 = 1_000;

    pub fn resume_grace(&self) -> Duration {
        Duration::from_millis(self.resume_grace_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageConfig {
    pub home_route: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            home_route: "/".to_string(),
        }
    }
}

impl Config {
    /// Reads the config at [`default_config_path`], or returns defaults when there is none.
    pub fn load() -> AppResult<Self> {
        default_config_path().map_or_else(|| Ok(Self::default()), Self::load_from_path)
    }

    /// A missing file yields defaults. Out-of-range values are clamped, never rejected.
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(_) if path.is_dir() => {
                return Err(AppError::invalid_argument(format!(
                    "tour config is a directory: {}",
                    path.display()
                )));
            }
            Err(err) => {
                return Err(AppError::io_with_context(
                    err,
                    format!("cannot read tour config {}", path.display()),
                ));
            }
        };
        toml::from_str::<Self>(&raw)
            .map(Self::sanitized)
            .map_err(|err| AppError::invalid_argument(format!("{}: {err}", path.display())))
    }

    pub fn sanitized(mut self) -> Self {
        let tour = &mut self.tour;
        let (hotspot_min, hotspot_max) = TourConfig::HOTSPOT_DWELL_RANGE_MS;
        tour.hotspot_dwell_ms = tour.hotspot_dwell_ms.clamp(hotspot_min, hotspot_max);
        let (workflow_min, workflow_max) = TourConfig::WORKFLOW_DWELL_RANGE_MS;
        tour.workflow_min_dwell_ms = tour.workflow_min_dwell_ms.clamp(workflow_min, workflow_max);
        tour.workflow_max_dwell_ms = tour
            .workflow_max_dwell_ms
            .clamp(tour.workflow_min_dwell_ms, workflow_max);
        tour.finale_highlight_dwell_ms = tour.finale_highlight_dwell_ms.max(1);

        let scroll = &mut self.scroll;
        scroll.frame_interval_ms = scroll.frame_interval_ms.max(1);
        if !scroll.scroll_ms_per_px.is_finite() || scroll.scroll_ms_per_px <= 0.0 {
            scroll.scroll_ms_per_px = ScrollConfig::default().scroll_ms_per_px;
        }
        scroll.finale_scroll_max_ms = scroll.finale_scroll_max_ms.max(scroll.finale_scroll_min_ms);

        self.inactivity.inactivity_poll_ms = self.inactivity.inactivity_poll_ms.max(1);
        self.gate.resume_grace_ms = self.gate.resume_grace_ms.min(GateConfig::MAX_RESUME_GRACE_MS);
        if self.page.home_route.trim().is_empty() {
            self.page.home_route = PageConfig::default().home_route;
        }
        self
    }
}

/// `GTOUR_CONFIG_PATH`, else `gtour/config.toml` under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = env_path(CONFIG_ENV_VAR) {
        return Some(explicit);
    }
    let base = env_path("XDG_CONFIG_HOME")
        .or_else(|| env_path("HOME").map(|home| home.join(".config")))
        .or_else(|| env_path("APPDATA"))?;
    Some(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Config;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("gtour_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn defaults_match_documented_tour_timings() {
        let config = Config::default();
        assert_eq!(config.tour.preroll_delay_ms, 6_000);
        assert_eq!(config.tour.inter_step_gap_ms, 3_000);
        assert_eq!(config.tour.max_hotspot_steps, 3);
        assert_eq!(config.tour.finale_highlight_count, 6);
        assert_eq!(config.tour.finale_highlight_dwell_ms, 2_000);
        assert_eq!(config.inactivity.inactivity_timeout_ms, 120_000);
        assert_eq!(config.inactivity.inactivity_poll_ms, 10_000);
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [tour]
            hotspot_dwell_ms = 20000
            workflow_min_dwell_ms = 5000
            workflow_max_dwell_ms = 1000
            finale_highlight_dwell_ms = 0

            [scroll]
            frame_interval_ms = 0
            scroll_ms_per_px = -3.0
            finale_scroll_min_ms = 4000
            finale_scroll_max_ms = 100

            [gate]
            resume_grace_ms = 5000

            [page]
            home_route = "  "
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.tour.hotspot_dwell_ms, 8_000);
        assert_eq!(config.tour.workflow_min_dwell_ms, 5_000);
        assert_eq!(config.tour.workflow_max_dwell_ms, 5_000);
        assert_eq!(config.tour.finale_highlight_dwell_ms, 1);
        assert_eq!(config.tour.preroll_delay_ms, 6_000);
        assert_eq!(config.scroll.frame_interval_ms, 1);
        assert_eq!(config.scroll.scroll_ms_per_px, 2.0);
        assert_eq!(config.scroll.finale_scroll_max_ms, 4_000);
        assert_eq!(config.gate.resume_grace_ms, 1_000);
        assert_eq!(config.page.home_route, "/");
        assert_eq!(config.inactivity.inactivity_timeout_ms, 120_000);

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn workflow_dwell_bounds_are_held_inside_the_allowed_range() {
        let mut config = Config::default();
        config.tour.workflow_min_dwell_ms = 1;
        config.tour.workflow_base_dwell_ms = 0;
        config.tour.workflow_max_dwell_ms = 60_000;

        let config = config.sanitized();
        assert_eq!(config.tour.workflow_min_dwell_ms, 4_000);
        assert_eq!(config.tour.workflow_max_dwell_ms, 15_000);

        let mut config = Config::default();
        config.tour.workflow_min_dwell_ms = 20_000;
        let config = config.sanitized();
        assert_eq!(config.tour.workflow_min_dwell_ms, 15_000);
        assert_eq!(config.tour.workflow_max_dwell_ms, 15_000);
    }

    #[test]
    fn load_from_path_rejects_malformed_toml() {
        let path = unique_temp_path("broken.toml");
        fs::write(&path, "[tour\npreroll_delay_ms = ").expect("config file should be written");

        assert!(Config::load_from_path(&path).is_err());

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn load_from_path_rejects_a_directory() {
        let dir = unique_temp_path("dir");
        fs::create_dir_all(&dir).expect("config dir should be created");

        let err = Config::load_from_path(&dir).expect_err("directory is not a config file");
        assert!(err.to_string().contains("directory"));

        fs::remove_dir_all(&dir).expect("config dir should be removed");
    }
}
