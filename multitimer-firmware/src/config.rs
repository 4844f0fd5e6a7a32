//! Engine configuration loading
//!
//! The configuration is a postcard blob in the flash store. When none is
//! stored, the configuration embedded from multitimer.toml is used and
//! written back so later boots find it.

use defmt::*;

use multitimer_core::EngineConfig;
use multitimer_hal::StorageError;
use multitimer_hal_rp2040::flash::{FlashIntStore, CONFIG_KEY};

include!(concat!(env!("OUT_DIR"), "/engine_config.rs"));

/// Maximum serialized config size
const MAX_CONFIG_SIZE: usize = 128;

/// Load the stored configuration, falling back to the embedded one
pub fn load_engine_config(store: &mut FlashIntStore<'_>) -> EngineConfig {
    let mut buf = [0u8; MAX_CONFIG_SIZE];

    match store.read_blob(CONFIG_KEY, &mut buf) {
        Ok(len) => match EngineConfig::from_bytes(&buf[..len]) {
            Ok(config) => {
                info!("Loaded engine configuration from flash");
                return config;
            }
            Err(e) => warn!("Stored configuration invalid: {:?}", e),
        },
        Err(StorageError::NotFound) => info!("No configuration in flash"),
        Err(e) => warn!("Failed to read configuration: {:?}", e),
    }

    let config = embedded_config();
    info!("Using embedded configuration");
    match config.to_bytes(&mut buf) {
        Ok(bytes) => {
            if let Err(e) = store.write_blob(CONFIG_KEY, bytes) {
                warn!("Failed to store configuration: {:?}", e);
            }
        }
        Err(e) => warn!("Failed to encode configuration: {:?}", e),
    }
    config
}
