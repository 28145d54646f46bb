/// rippled Mock Server Library
///
/// A stand-in for a rippled websocket endpoint and the test network faucet,
/// usable as a standalone binary or started in-process from tests.

pub mod handlers;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use handlers::handle_command;
pub use server::{create_router, run_server, MockServer};
pub use state::{transaction_hash, MockLedger, SharedLedger};
