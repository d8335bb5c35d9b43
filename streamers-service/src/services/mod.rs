pub mod aggregator;
pub mod streamers;

pub use aggregator::StreamAggregator;
pub use streamers::StreamersService;
