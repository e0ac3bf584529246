use crate::util::error::AtlasError;
use crate::util::preferences::PreferenceStore;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Preference key holding a user-chosen quality tier.
pub const QUALITY_OVERRIDE_KEY: &str = "mapapp-quality-override";

/// Coarse rendering fidelity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }

    /// Exact stored key (`low`, `medium`, `high`); anything else is `None`.
    /// Unlike [`FromStr`], no trimming or case folding is applied.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "low" => Some(QualityTier::Low),
            "medium" => Some(QualityTier::Medium),
            "high" => Some(QualityTier::High),
            _ => None,
        }
    }

    /// Maps a capability score onto a tier: `<= 0` low, `<= 3` medium.
    pub fn from_score(score: i32) -> Self {
        if score <= 0 {
            QualityTier::Low
        } else if score <= 3 {
            QualityTier::Medium
        } else {
            QualityTier::High
        }
    }

    pub fn preset(&self) -> QualityPreset {
        match self {
            QualityTier::Low => QualityPreset {
                resolution_scale: 0.75,
                maximum_screen_space_error: 8.0,
                msaa_samples: 1,
                antialias: false,
                maximum_anisotropy: 1,
                tile_cache_size: 50,
                description: "Optimized for performance on mobile and low-end devices",
            },
            QualityTier::Medium => QualityPreset {
                resolution_scale: 0.9,
                maximum_screen_space_error: 3.0,
                msaa_samples: 2,
                antialias: true,
                maximum_anisotropy: 8,
                tile_cache_size: 100,
                description: "Balanced quality and performance for most devices",
            },
            QualityTier::High => QualityPreset {
                resolution_scale: 1.0,
                maximum_screen_space_error: 2.0,
                msaa_samples: 4,
                antialias: true,
                maximum_anisotropy: 16,
                tile_cache_size: 150,
                description: "Maximum quality for high-end devices",
            },
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            _ => Err(AtlasError::InvalidQualityTier(s.to_string())),
        }
    }
}

/// Renderer settings applied for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityPreset {
    pub resolution_scale: f64,
    pub maximum_screen_space_error: f64,
    pub msaa_samples: u32,
    pub antialias: bool,
    pub maximum_anisotropy: u32,
    pub tile_cache_size: u32,
    pub description: &'static str,
}

/// GPU class guessed from the WebGL renderer string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuTier {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

static GPU_LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Mali-4|Adreno [1-3]|PowerVR SGX").expect("valid regex"));
static GPU_MEDIUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Mali-[GT][67]|Adreno [45]|Intel HD [45]").expect("valid regex")
});
static GPU_HIGH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)RTX|GTX|Radeon RX|Mali-G[79]|Adreno [67]").expect("valid regex")
});

static UA_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("valid regex")
});
static UA_IPAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)iPad").expect("valid regex"));
static UA_ANDROID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Android").expect("valid regex"));
static UA_ANDROID_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Android.*mobile").expect("valid regex"));

impl GpuTier {
    /// Classifies a renderer string. Checks run low, medium, high and the
    /// first match wins.
    pub fn from_renderer(renderer: &str) -> Self {
        if GPU_LOW.is_match(renderer) {
            GpuTier::Low
        } else if GPU_MEDIUM.is_match(renderer) {
            GpuTier::Medium
        } else if GPU_HIGH.is_match(renderer) {
            GpuTier::High
        } else {
            GpuTier::Unknown
        }
    }
}

/// Network quality as reported by the browser's connection API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectiveConnection {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
}

impl EffectiveConnection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => Some(Self::Slow2g),
            "2g" => Some(Self::TwoG),
            "3g" => Some(Self::ThreeG),
            "4g" => Some(Self::FourG),
            _ => None,
        }
    }

    pub fn is_slow(&self) -> bool {
        !matches!(self, Self::FourG)
    }
}

/// Hardware, network and preference signals gathered by the host page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSignals {
    pub hardware_threads: Option<u32>,
    /// Approximate device memory in gigabytes.
    pub device_memory_gb: Option<f64>,
    pub gpu_tier: GpuTier,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub effective_connection: Option<EffectiveConnection>,
    pub save_data: bool,
    pub pixel_ratio: f64,
    /// Physical screen size in device pixels.
    pub screen_width: f64,
    pub screen_height: f64,
    pub prefers_reduced_motion: bool,
}

impl Default for DeviceSignals {
    fn default() -> Self {
        Self {
            hardware_threads: None,
            device_memory_gb: None,
            gpu_tier: GpuTier::Unknown,
            is_mobile: false,
            is_tablet: false,
            effective_connection: None,
            save_data: false,
            pixel_ratio: 1.0,
            screen_width: 1920.0,
            screen_height: 1080.0,
            prefers_reduced_motion: false,
        }
    }
}

impl DeviceSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the mobile and tablet flags from a user agent string.
    ///
    /// `min_screen_css_px` is the smaller screen dimension in CSS pixels;
    /// mobile devices at least 768px wide also count as tablets.
    pub fn user_agent(mut self, ua: &str, min_screen_css_px: f64) -> Self {
        self.is_mobile = UA_MOBILE.is_match(ua);
        let android_tablet = UA_ANDROID.is_match(ua) && !UA_ANDROID_MOBILE.is_match(ua);
        self.is_tablet = UA_IPAD.is_match(ua)
            || android_tablet
            || (self.is_mobile && min_screen_css_px >= 768.0);
        self
    }

    pub fn hardware_threads(mut self, threads: u32) -> Self {
        self.hardware_threads = Some(threads);
        self
    }

    pub fn device_memory_gb(mut self, gb: f64) -> Self {
        self.device_memory_gb = Some(gb);
        self
    }

    pub fn gpu_tier(mut self, tier: GpuTier) -> Self {
        self.gpu_tier = tier;
        self
    }

    pub fn gpu_renderer(mut self, renderer: &str) -> Self {
        self.gpu_tier = GpuTier::from_renderer(renderer);
        self
    }

    pub fn mobile(mut self, is_mobile: bool, is_tablet: bool) -> Self {
        self.is_mobile = is_mobile;
        self.is_tablet = is_tablet;
        self
    }

    pub fn connection(mut self, connection: Option<EffectiveConnection>, save_data: bool) -> Self {
        self.effective_connection = connection;
        self.save_data = save_data;
        self
    }

    /// Sets pixel ratio and the screen size in CSS pixels.
    pub fn screen(mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        self.pixel_ratio = ratio;
        self.screen_width = css_width * ratio;
        self.screen_height = css_height * ratio;
        self
    }

    pub fn reduced_motion(mut self, prefers_reduced_motion: bool) -> Self {
        self.prefers_reduced_motion = prefers_reduced_motion;
        self
    }

    pub fn is_high_dpi(&self) -> bool {
        self.pixel_ratio >= 2.0
    }

    pub fn is_low_resolution(&self) -> bool {
        self.screen_width.max(self.screen_height) < 1920.0
    }

    pub fn is_slow_connection(&self) -> bool {
        self.effective_connection.is_some_and(|c| c.is_slow())
    }

    /// Capability score; higher is better.
    pub fn score(&self) -> i32 {
        let mut score = 0;

        match self.hardware_threads {
            Some(t) if t >= 8 => score += 2,
            Some(t) if t >= 4 => score += 1,
            _ => {}
        }

        match self.device_memory_gb {
            Some(m) if m >= 8.0 => score += 2,
            Some(m) if m >= 4.0 => score += 1,
            _ => {}
        }

        score += match self.gpu_tier {
            GpuTier::High => 3,
            GpuTier::Medium => 1,
            GpuTier::Low => -2,
            GpuTier::Unknown => 0,
        };

        if self.is_mobile && !self.is_tablet {
            score -= 2;
        } else if !self.is_tablet {
            score += 1;
        }

        if self.save_data {
            score -= 2;
        }
        if self.is_slow_connection() {
            score -= 1;
        }
        if self.effective_connection == Some(EffectiveConnection::FourG) {
            score += 1;
        }

        if self.is_high_dpi() && !self.is_low_resolution() {
            score += 1;
        }
        if self.is_low_resolution() {
            score -= 1;
        }

        if self.prefers_reduced_motion {
            score -= 2;
        }

        score
    }

    pub fn tier(&self) -> QualityTier {
        QualityTier::from_score(self.score())
    }
}

/// Detected tier plus the motion flags the viewer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfile {
    pub detected_tier: QualityTier,
    pub prefers_reduced_motion: bool,
}

impl QualityProfile {
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        let score = signals.score();
        let detected_tier = QualityTier::from_score(score);
        debug!(score, tier = %detected_tier, "scored device capabilities");
        Self {
            detected_tier,
            prefers_reduced_motion: signals.prefers_reduced_motion,
        }
    }

    /// Judged on the detected tier, ignoring any user override.
    pub fn is_low_power(&self) -> bool {
        self.detected_tier == QualityTier::Low
    }

    /// Whether animations should be skipped.
    pub fn minimise_motion(&self) -> bool {
        self.prefers_reduced_motion || self.is_low_power()
    }

    /// Tier in effect: a valid stored override wins over detection.
    pub fn effective_tier<S: PreferenceStore + ?Sized>(&self, store: &S) -> QualityTier {
        store
            .get(QUALITY_OVERRIDE_KEY)
            .and_then(|v| QualityTier::from_key(&v))
            .unwrap_or(self.detected_tier)
    }

    pub fn settings<S: PreferenceStore + ?Sized>(&self, store: &S) -> QualityPreset {
        self.effective_tier(store).preset()
    }
}

/// Stores or clears the user's quality override.
pub fn set_quality_override<S: PreferenceStore + ?Sized>(
    store: &mut S,
    tier: Option<QualityTier>,
) -> Result<(), AtlasError> {
    match tier {
        Some(tier) => {
            store.set(QUALITY_OVERRIDE_KEY, tier.as_str())?;
            info!(%tier, "quality override set");
        }
        None => {
            store.remove(QUALITY_OVERRIDE_KEY)?;
            info!("quality override cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::preferences::MemoryPreferences;

    fn desktop() -> DeviceSignals {
        DeviceSignals::new()
            .hardware_threads(16)
            .device_memory_gb(16.0)
            .gpu_renderer("ANGLE (NVIDIA GeForce RTX 3080 Direct3D11)")
            .connection(Some(EffectiveConnection::FourG), false)
            .screen(1920.0, 1080.0, 2.0)
    }

    #[test]
    fn test_score_thresholds() {
        assert_eq!(QualityTier::from_score(-3), QualityTier::Low);
        assert_eq!(QualityTier::from_score(0), QualityTier::Low);
        assert_eq!(QualityTier::from_score(1), QualityTier::Medium);
        assert_eq!(QualityTier::from_score(3), QualityTier::Medium);
        assert_eq!(QualityTier::from_score(4), QualityTier::High);
    }

    #[test]
    fn test_high_end_desktop() {
        let signals = desktop();
        // threads 2 + memory 2 + gpu 3 + desktop 1 + 4g 1 + hi-dpi 1
        assert_eq!(signals.score(), 10);
        assert_eq!(signals.tier(), QualityTier::High);
    }

    #[test]
    fn test_budget_phone() {
        let signals = DeviceSignals::new()
            .hardware_threads(4)
            .device_memory_gb(2.0)
            .gpu_renderer("Mali-400 MP")
            .mobile(true, false)
            .connection(Some(EffectiveConnection::ThreeG), true)
            .screen(360.0, 640.0, 2.0);
        // threads 1, gpu -2, phone -2, save-data -2, slow -1, low-res -1
        assert_eq!(signals.score(), -7);
        assert_eq!(signals.tier(), QualityTier::Low);
    }

    #[test]
    fn test_tablet_scores_neutral_for_device_type() {
        let base = DeviceSignals::new().screen(1920.0, 1080.0, 1.0);
        let tablet = base.clone().mobile(true, true);
        assert_eq!(base.score() - tablet.score(), 1);
    }

    #[test]
    fn test_reduced_motion_penalty() {
        let a = desktop();
        let b = desktop().reduced_motion(true);
        assert_eq!(a.score() - b.score(), 2);
    }

    #[test]
    fn test_gpu_classification() {
        assert_eq!(GpuTier::from_renderer("Adreno 306"), GpuTier::Low);
        assert_eq!(GpuTier::from_renderer("Intel HD 520"), GpuTier::Medium);
        assert_eq!(GpuTier::from_renderer("Mali-G76 MC4"), GpuTier::Medium);
        assert_eq!(GpuTier::from_renderer("Mali-G910"), GpuTier::High);
        assert_eq!(GpuTier::from_renderer("AMD Radeon RX 6800"), GpuTier::High);
        assert_eq!(GpuTier::from_renderer("Apple M2"), GpuTier::Unknown);
    }

    #[test]
    fn test_user_agent_detection() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
        let s = DeviceSignals::new().user_agent(iphone, 390.0);
        assert!(s.is_mobile);
        assert!(!s.is_tablet);

        let ipad = "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)";
        let s = DeviceSignals::new().user_agent(ipad, 820.0);
        assert!(s.is_mobile && s.is_tablet);

        let android_tab = "Mozilla/5.0 (Linux; Android 13; SM-X700)";
        assert!(DeviceSignals::new().user_agent(android_tab, 800.0).is_tablet);

        let android_phone = "Mozilla/5.0 (Linux; Android 13; Pixel 7) Mobile Safari";
        assert!(!DeviceSignals::new().user_agent(android_phone, 412.0).is_tablet);

        let desktop_ua = "Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0";
        let s = DeviceSignals::new().user_agent(desktop_ua, 1080.0);
        assert!(!s.is_mobile && !s.is_tablet);
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("High".parse::<QualityTier>(), Ok(QualityTier::High));
        assert!(matches!(
            "ultra".parse::<QualityTier>(),
            Err(AtlasError::InvalidQualityTier(_))
        ));
    }

    #[test]
    fn test_presets() {
        assert_eq!(QualityTier::Low.preset().tile_cache_size, 50);
        assert!(!QualityTier::Low.preset().antialias);
        assert_eq!(QualityTier::High.preset().msaa_samples, 4);
    }

    #[test]
    fn test_override_wins_and_clears() -> Result<(), AtlasError> {
        let profile = QualityProfile::from_signals(&desktop());
        let mut store = MemoryPreferences::new();
        assert_eq!(profile.effective_tier(&store), QualityTier::High);

        set_quality_override(&mut store, Some(QualityTier::Low))?;
        assert_eq!(profile.settings(&store), QualityTier::Low.preset());

        set_quality_override(&mut store, None)?;
        assert_eq!(profile.effective_tier(&store), QualityTier::High);
        Ok(())
    }

    #[test]
    fn test_invalid_stored_override_is_ignored() -> Result<(), AtlasError> {
        let profile = QualityProfile::from_signals(&desktop());
        let mut store = MemoryPreferences::new();
        store.set(QUALITY_OVERRIDE_KEY, "ultra")?;
        assert_eq!(profile.effective_tier(&store), QualityTier::High);

        for loose in ["Low", " low", "LOW "] {
            store.set(QUALITY_OVERRIDE_KEY, loose)?;
            assert_eq!(profile.effective_tier(&store), QualityTier::High);
        }

        store.set(QUALITY_OVERRIDE_KEY, "low")?;
        assert_eq!(profile.effective_tier(&store), QualityTier::Low);
        Ok(())
    }

    #[test]
    fn test_minimise_motion() {
        let phone = QualityProfile::from_signals(&DeviceSignals::new().mobile(true, false));
        assert!(phone.is_low_power());
        assert!(phone.minimise_motion());

        let desk = QualityProfile::from_signals(&desktop().reduced_motion(true));
        assert!(!desk.is_low_power());
        assert!(desk.minimise_motion());
    }
}
