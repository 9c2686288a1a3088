pub use config::*;
pub use raffle::*;
pub use vault::*;

pub mod config;
pub mod raffle;
pub mod vault;
