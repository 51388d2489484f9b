pub mod momentum;
pub mod trend;

pub use momentum::{compute_oscillator, rsi_series};
pub use trend::compute_smoothed;
