//! Collaborator traits
//!
//! These traits define the interface between the engine and the parts of
//! the application it does not own: bitmap decoding for icons and the
//! outbound peer notification channel.

pub mod bitmap;
pub mod notifier;

pub use bitmap::BitmapLoader;
pub use notifier::PeerNotifier;
