//! # Bitlob
//!
//! A bitmap-indexed limit order book matching engine.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: one thread owns the book exclusively (no locks)
//! - **Dense Price Levels**: prices index directly into preallocated arrays
//! - **Bitmap Best-Price Tracking**: top of book found by word-level bit scans
//! - **Bounded Trade Reporting**: fixed trade buffer, no allocation per match
//!
//! ## Architecture
//!
//! ```text
//! [Caller] --> OrderBook::add_order --> matching loop --> trade buffer
//!                      |                      |
//!               order index          level arrays + bitmaps
//! ```
//!
//! Fills are reported by return: after each `add_order` the caller reads
//! the trade buffer via [`OrderBook::trades`]. The buffer contents are valid
//! only until the next mutating call.

pub mod bitmap;
pub mod order;
pub mod price_level;
pub mod trades;
pub mod order_book;
pub mod matching;
pub mod engine;

// Re-exports for convenience
pub use bitmap::LevelBitmap;
pub use order::{Order, Quote, Side, Trade};
pub use price_level::PriceLevel;
pub use trades::{TradeBuffer, MAX_TRADES};
pub use order_book::{OrderBook, MAX_PRICE};
pub use engine::{AddOrder, CancelOrder, Command, Engine, ModifyOrder};
