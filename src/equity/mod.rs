mod calc;

pub use calc::{holdem_equities, Equity, EquityError};
