//! Flash-backed integer store for RP2040
//!
//! Uses sequential-storage for a wear-leveled key-value map in the last
//! 64KB of flash. Integers are stored as 4 little-endian bytes; the engine
//! configuration blob lives in the same map under [`CONFIG_KEY`].
//!
//! The engine calls storage synchronously, so each operation drives the
//! async flash driver to completion with `block_on`.

use embassy_futures::block_on;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use multitimer_hal::{IntStore, StorageError, StorageKey};

/// Flash storage layout
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
pub const STORE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORE_PARTITION_START: usize = FLASH_SIZE - STORE_PARTITION_SIZE;

/// Flash range for the store partition
pub const STORE_RANGE: core::ops::Range<u32> =
    (STORE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Key of the serialized engine configuration
pub const CONFIG_KEY: StorageKey = StorageKey(0);

/// Scratch buffer for one map item (key, length and value)
const ITEM_BUF_SIZE: usize = 256;

/// Integer store in the RP2040 flash
pub struct FlashIntStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> FlashIntStore<'d> {
    /// Create a new store over the flash peripheral
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Copy the raw bytes stored at `key` into `out`
    pub fn read_blob(&mut self, key: StorageKey, out: &mut [u8]) -> Result<usize, StorageError> {
        let mut buf = [0u8; ITEM_BUF_SIZE];
        let data = self.fetch(key, &mut buf)?;
        if out.len() < data.len() {
            return Err(StorageError::Corrupted);
        }
        out[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    /// Store raw bytes at `key`
    pub fn write_blob(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let mut buf = [0u8; ITEM_BUF_SIZE];
        block_on(map::store_item(
            &mut self.flash,
            STORE_RANGE,
            &mut NoCache::new(),
            &mut buf,
            &key,
            &data,
        ))
        .map_err(storage_error)
    }

    fn fetch<'b>(&mut self, key: StorageKey, buf: &'b mut [u8]) -> Result<&'b [u8], StorageError> {
        let item = block_on(map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORE_RANGE,
            &mut NoCache::new(),
            buf,
            &key,
        ))
        .map_err(storage_error)?;

        match item {
            // Empty items are deletion markers
            Some(data) if !data.is_empty() => Ok(data),
            _ => Err(StorageError::NotFound),
        }
    }
}

impl<'d> IntStore for FlashIntStore<'d> {
    fn read(&mut self, key: StorageKey) -> Result<i32, StorageError> {
        let mut buf = [0u8; ITEM_BUF_SIZE];
        let data = self.fetch(key, &mut buf)?;
        let raw: [u8; 4] = data.try_into().map_err(|_| StorageError::Corrupted)?;
        Ok(i32::from_le_bytes(raw))
    }

    fn write(&mut self, key: StorageKey, value: i32) -> Result<(), StorageError> {
        self.write_blob(key, &value.to_le_bytes())
    }

    fn delete(&mut self, key: StorageKey) -> Result<(), StorageError> {
        if !self.exists(key) {
            return Ok(());
        }
        self.write_blob(key, &[])
    }
}

fn storage_error<E>(err: sequential_storage::Error<E>) -> StorageError {
    match err {
        sequential_storage::Error::FullStorage => StorageError::Full,
        _ => StorageError::Unavailable,
    }
}
