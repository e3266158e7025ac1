//! RiyalScript Runtime - run-mode evaluator and market-data collaborator
//!
//! Two halves:
//! - `interpreter`: the minimal synchronous evaluator behind `run` mode
//! - `market`: the asynchronous market-data function table the language's
//!   `market.*` calls resolve against

pub mod error;
pub mod interpreter;
pub mod market;

// Re-export main types
pub use error::{Result, RuntimeError};
pub use interpreter::{Environment, Interpreter};
pub use market::{resolve_market_calls, MarketDataClient, MarketFunctions, MarketProvider};
