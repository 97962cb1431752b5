//! In-memory stores
//!
//! The directory and the ledger each own their map outright; everything
//! else goes through their methods.

pub mod directory;
pub mod ledger;
pub mod seed;

pub use directory::ClientDirectory;
pub use ledger::MessageLedger;
