//! Persistent integer storage abstractions
//!
//! The engine persists everything as signed 32-bit integers under small
//! numeric keys. Implementations are free to back this with flash, EEPROM
//! or RAM; wear leveling and integrity are their concern.

/// Key of a persisted integer
///
/// A thin wrapper so the key can implement storage-backend traits without
/// leaking them into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageKey(pub u32);

impl StorageKey {
    /// Get the raw key value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for StorageKey {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Key not found
    NotFound,
    /// Backend could not be accessed
    Unavailable,
    /// Stored value could not be decoded
    Corrupted,
    /// Storage is full
    Full,
}

/// Key → integer store
///
/// All operations are synchronous; the engine calls them from a single
/// context and never across an await point.
pub trait IntStore {
    /// Read the integer stored at `key`
    fn read(&mut self, key: StorageKey) -> Result<i32, StorageError>;

    /// Store `value` at `key`, replacing any previous value
    fn write(&mut self, key: StorageKey, value: i32) -> Result<(), StorageError>;

    /// Check if a value exists at `key`
    fn exists(&mut self, key: StorageKey) -> bool {
        self.read(key).is_ok()
    }

    /// Remove the value at `key`
    ///
    /// Deleting a missing key is not an error.
    fn delete(&mut self, key: StorageKey) -> Result<(), StorageError>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.len() < 4 {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[..4].copy_from_slice(&self.0.to_le_bytes());
        Ok(4)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.len() < 4 {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&buffer[..4]);
        Ok((StorageKey(u32::from_le_bytes(raw)), 4))
    }
}
