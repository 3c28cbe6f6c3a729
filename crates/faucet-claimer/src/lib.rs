//! Faucet Claimer - keeps claiming testnet funds for one address
//!
//! This crate implements a small polling client:
//! 1. The wallet address is read from a local JSON record, or asked for once and stored
//! 2. The address is POSTed to the faucet's claim endpoint
//! 3. The reply is classified (funds sent, informational, failed) and printed
//! 4. After a fixed interval the claim is repeated, until the process is interrupted

pub mod client;
pub mod config;
pub mod error;
pub mod json;
pub mod outcome;
pub mod poll;
pub mod prompt;
pub mod store;

pub use client::{ClaimApi, ClaimResponse, FaucetClient};
pub use config::ClaimerConfig;
pub use error::{ClaimerError, ClaimerResult};
pub use outcome::ClaimOutcome;
pub use poll::{resolve_address, Clock, PollLoop, PollStats, TokioClock};
pub use store::AddressStore;
