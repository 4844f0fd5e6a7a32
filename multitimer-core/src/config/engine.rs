//! Engine tunables

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use heapless::{String, Vec};

use crate::record::MAX_TIMERS;

/// Magic number to identify a valid stored configuration
pub const CONFIG_MAGIC: u32 = 0x4D54_4D52; // "MTMR"

/// Current stored configuration version
pub const CONFIG_VERSION: u8 = 1;

/// Seconds before the earliest expiry at which the device is woken
pub const DEFAULT_WAKE_LEAD_SEC: u32 = 8;

/// Delay used instead when the computed wake time has already passed
pub const DEFAULT_WAKE_GRACE_SEC: u32 = 5;

/// Countdowns created on first run
pub const DEFAULT_SEED_DURATIONS: [u32; 3] = [60, 5 * 60, 10 * 60];

/// Prefix of every timeline pin title
pub const DEFAULT_TITLE_PREFIX: &str = "Multi-Timer+";

/// Maximum length of the title prefix
pub const TITLE_PREFIX_LEN: usize = 16;

/// Errors from configuration validation and decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Magic number mismatch
    BadMagic,
    /// Stored with an unknown version
    UnsupportedVersion,
    /// Blob could not be decoded or encoded
    Encoding,
    /// A value is outside its allowed range
    InvalidValue,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Wake this many seconds before the earliest countdown expires
    pub wake_lead_sec: u32,
    /// Fallback delay when the wake time has already passed
    pub wake_grace_sec: u32,
    /// Countdown durations created on first run
    pub seed_durations: Vec<u32, MAX_TIMERS>,
    /// Prefix of timeline pin titles
    pub title_prefix: String<TITLE_PREFIX_LEN>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut seed_durations = Vec::new();
        for secs in DEFAULT_SEED_DURATIONS {
            let _ = seed_durations.push(secs);
        }
        let mut title_prefix = String::new();
        let _ = title_prefix.push_str(DEFAULT_TITLE_PREFIX);

        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            wake_lead_sec: DEFAULT_WAKE_LEAD_SEC,
            wake_grace_sec: DEFAULT_WAKE_GRACE_SEC,
            seed_durations,
            title_prefix,
        }
    }
}

impl EngineConfig {
    /// Check magic, version and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.magic != CONFIG_MAGIC {
            return Err(ConfigError::BadMagic);
        }
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion);
        }
        // A zero grace would schedule a wake for the current second
        if self.wake_grace_sec == 0 {
            return Err(ConfigError::InvalidValue);
        }
        Ok(())
    }

    /// Decode and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }
}
