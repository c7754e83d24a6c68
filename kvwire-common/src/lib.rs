// kvwire-common - Reply model, coercion, and transport contract for kvwire
//
// This crate is the leaf of the workspace: it knows nothing about sockets
// or about individual commands.

pub mod arg;
pub mod coerce;
pub mod error;
pub mod reply;
pub mod transport;

// Re-export for convenience
pub use arg::*;
pub use coerce::*;
pub use error::*;
pub use reply::*;
pub use transport::*;
