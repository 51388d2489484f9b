//! External collaborators: market data and notifications.

pub mod market_data;
pub mod telegram;
pub mod yahoo;

pub use market_data::{InMemorySource, TimeSeriesSource};
pub use telegram::TelegramClient;
pub use yahoo::YahooClient;
