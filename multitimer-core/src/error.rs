//! Error types shared across the engine

/// Errors returned by record operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// All record slots are in use
    CapacityExceeded,
    /// No live record at the given index
    NotFound,
    /// Operation needs a selected record and none is selected
    NoSelection,
    /// Value outside its catalog or picker range
    OutOfRange,
    /// Operation not allowed while the record is running
    RecordRunning,
}

/// Errors from the peer notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyError {
    /// A message is already in flight
    Busy,
    /// Message could not be encoded
    Encode,
    /// Link to the peer is down
    Link,
}

/// Errors from bitmap materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitmapError {
    /// Resource does not exist
    NotFound,
    /// Not enough memory to decode the bitmap
    OutOfMemory,
}

/// Errors from the icon cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IconCacheError {
    /// Icon index is outside the catalog
    UnknownIcon,
    /// Loader failed to materialize the bitmap
    Materialize(BitmapError),
}

impl From<BitmapError> for IconCacheError {
    fn from(err: BitmapError) -> Self {
        IconCacheError::Materialize(err)
    }
}
