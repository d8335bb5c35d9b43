mod streamers;

pub use streamers::{get_streamers, StreamersHandlerState};
