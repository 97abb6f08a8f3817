//! Engine - command-driven front end over the order book.
//!
//! Wraps the book behind a [`Command`] surface for event-loop usage and
//! adds warm-up and determinism helpers. With the `runtime` feature the
//! engine runs a single-writer busy-wait loop over rtrb ring buffers,
//! pinned to an isolated core.

use crate::order::Side;
use crate::order_book::OrderBook;

/// Submit a new order
#[derive(Clone, Copy, Debug)]
pub struct AddOrder {
    /// Caller-assigned order id, unique over the lifetime of the book
    pub order_id: u64,
    /// Order side (buy/sell)
    pub side: Side,
    /// Limit price in `[0, MAX_PRICE)`
    pub price: u32,
    /// Order quantity
    pub quantity: u32,
}

/// Cancel a resting order
#[derive(Clone, Copy, Debug)]
pub struct CancelOrder {
    /// Order id to cancel
    pub order_id: u64,
}

/// Amend a resting order's quantity in place
#[derive(Clone, Copy, Debug)]
pub struct ModifyOrder {
    /// Order id to amend
    pub order_id: u64,
    /// Replacement quantity
    pub new_quantity: u32,
}

/// Input commands for the engine loop
#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// Submit a new order
    Add(AddOrder),
    /// Cancel a resting order
    Cancel(CancelOrder),
    /// Amend a resting order's quantity
    Modify(ModifyOrder),
}

/// The engine: an order book plus its command front end.
pub struct Engine {
    /// The underlying book
    pub book: OrderBook,
}

impl Engine {
    /// Create an engine with the order index pre-sized for `capacity`
    /// resting orders.
    pub fn new(capacity: usize) -> Self {
        Self {
            book: OrderBook::with_capacity(capacity),
        }
    }

    /// Process a single command.
    ///
    /// This is the entry point for synchronous usage (tests, benchmarks).
    /// After an `Add`, any executed trades are readable from
    /// `self.book.trades()` until the next command.
    #[inline]
    pub fn process_command(&mut self, cmd: Command) {
        match cmd {
            Command::Add(add) => {
                self.book
                    .add_order(add.order_id, add.side, add.price, add.quantity)
            }
            Command::Cancel(cancel) => self.book.cancel_order(cancel.order_id),
            Command::Modify(modify) => {
                self.book.modify_order(modify.order_id, modify.new_quantity)
            }
        }
    }

    /// Run the engine event loop.
    ///
    /// # Arguments
    /// * `input` - Consumer end of the command ring buffer
    /// * `output` - Producer end of the trade ring buffer
    /// * `pin_to_core` - Whether to pin to the last available CPU core
    ///
    /// # Note
    /// This function runs forever (until the program terminates). Trades
    /// that do not fit in the output ring are dropped, mirroring the trade
    /// buffer's own overflow policy.
    #[cfg(feature = "runtime")]
    pub fn run(
        &mut self,
        input: &mut rtrb::Consumer<Command>,
        output: &mut rtrb::Producer<crate::order::Trade>,
        pin_to_core: bool,
    ) {
        if pin_to_core {
            self.pin_to_core();
        }

        self.warm_up();

        loop {
            while let Ok(cmd) = input.pop() {
                let was_add = matches!(cmd, Command::Add(_));
                self.process_command(cmd);
                if was_add {
                    for &trade in self.book.trades() {
                        // Best effort - drop if full
                        let _ = output.push(trade);
                    }
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Pin the current thread to the last available CPU core.
    ///
    /// The last core is typically isolated from OS interrupts.
    #[cfg(feature = "runtime")]
    pub fn pin_to_core(&self) {
        if let Some(core_ids) = core_affinity::get_core_ids() {
            if let Some(last_core) = core_ids.last() {
                core_affinity::set_for_current(*last_core);
            }
        }
    }

    /// Warm up the engine by pre-faulting the level arrays.
    pub fn warm_up(&mut self) {
        self.book.warm_up();
    }

    /// Compute a hash of the current state (for determinism testing).
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        let quote = self.book.quote();
        quote.bid_price.hash(&mut hasher);
        quote.bid_quantity.hash(&mut hasher);
        quote.ask_price.hash(&mut hasher);
        quote.ask_quantity.hash(&mut hasher);

        self.book.best_bid().hash(&mut hasher);
        self.book.best_ask().hash(&mut hasher);
        self.book.order_count().hash(&mut hasher);

        hasher.finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(1_000_000) // 1M orders default capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Quote, Trade};

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new(10_000);
        assert!(engine.book.is_empty());
        assert_eq!(engine.book.quote(), Quote::default());
    }

    #[test]
    fn test_engine_add_and_match() {
        let mut engine = Engine::new(1000);

        engine.process_command(Command::Add(AddOrder {
            order_id: 1,
            side: Side::Sell,
            price: 100,
            quantity: 10,
        }));
        assert!(engine.book.trades().is_empty());

        engine.process_command(Command::Add(AddOrder {
            order_id: 2,
            side: Side::Buy,
            price: 100,
            quantity: 4,
        }));
        assert_eq!(engine.book.trades(), &[Trade::new(2, 1, 100, 4)]);
        assert_eq!(engine.book.quote(), Quote::new(0, 0, 100, 6));
    }

    #[test]
    fn test_engine_cancel_and_modify() {
        let mut engine = Engine::new(1000);

        engine.process_command(Command::Add(AddOrder {
            order_id: 1,
            side: Side::Buy,
            price: 50,
            quantity: 10,
        }));
        engine.process_command(Command::Modify(ModifyOrder {
            order_id: 1,
            new_quantity: 3,
        }));
        assert_eq!(engine.book.quote(), Quote::new(50, 3, 0, 0));

        engine.process_command(Command::Cancel(CancelOrder { order_id: 1 }));
        assert_eq!(engine.book.quote(), Quote::default());
    }

    #[test]
    fn test_engine_state_hash_determinism() {
        let mut engine1 = Engine::new(1000);
        let mut engine2 = Engine::new(1000);

        for i in 0..100u64 {
            let cmd = Command::Add(AddOrder {
                order_id: i,
                side: if i % 2 == 0 { Side::Buy } else { Side::Sell },
                price: 10_000 + (i as u32 % 10) * 10,
                quantity: 100,
            });
            engine1.process_command(cmd);
            engine2.process_command(cmd);
        }

        assert_eq!(engine1.state_hash(), engine2.state_hash());
    }

    #[test]
    fn test_engine_warm_up() {
        let mut engine = Engine::new(1000);
        engine.warm_up(); // Should not panic
    }
}
