//! Core value types: order side, order records, trades, and quotes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order side (buy = bid, sell = ask)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    Buy = 0,
    /// Sell side (asks)
    Sell = 1,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A resting order record, owned by the book's order index.
///
/// Price-level FIFOs reference orders by id only; the record here is the
/// single source of truth for the remaining quantity. A record whose
/// `deleted` flag is set is a tombstone: logically gone, physically retained
/// until pruned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    /// Caller-assigned identifier, unique over the lifetime of the book
    pub order_id: u64,
    /// Which side of the book the order rests on
    pub side: Side,
    /// Limit price, in `[0, MAX_PRICE)`
    pub price: u32,
    /// Remaining open quantity
    pub quantity: u32,
    /// Tombstone flag
    pub deleted: bool,
}

impl Order {
    /// Create a live order record
    #[inline]
    pub const fn new(order_id: u64, side: Side, price: u32, quantity: u32) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
            deleted: false,
        }
    }
}

/// An executed match between one buy order and one sell order.
///
/// The price is always the resting (maker) order's price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    pub buy_order_id: u64,
    pub sell_order_id: u64,
    pub price: u32,
    pub quantity: u32,
}

impl Trade {
    #[inline]
    pub const fn new(buy_order_id: u64, sell_order_id: u64, price: u32, quantity: u32) -> Self {
        Self {
            buy_order_id,
            sell_order_id,
            price,
            quantity,
        }
    }
}

/// Top-of-book snapshot.
///
/// A side with no liquidity reports both of its fields as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quote {
    pub bid_price: u32,
    pub bid_quantity: u32,
    pub ask_price: u32,
    pub ask_quantity: u32,
}

impl Quote {
    #[inline]
    pub const fn new(bid_price: u32, bid_quantity: u32, ask_price: u32, ask_quantity: u32) -> Self {
        Self {
            bid_price,
            bid_quantity,
            ask_price,
            ask_quantity,
        }
    }
}
