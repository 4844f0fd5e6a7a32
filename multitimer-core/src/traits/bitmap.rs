//! Bitmap materialization for icons

use crate::error::BitmapError;

/// Decodes bitmap resources into drawable handles
///
/// Handles are owned by whoever loaded them; the icon cache hands every
/// handle it loaded back to [`BitmapLoader::release`] exactly once.
pub trait BitmapLoader {
    /// A materialized bitmap
    type Handle;

    /// Materialize the bitmap for a resource name
    fn load(&mut self, resource: &'static str) -> Result<Self::Handle, BitmapError>;

    /// Free a bitmap previously returned by `load`
    fn release(&mut self, handle: Self::Handle);
}
