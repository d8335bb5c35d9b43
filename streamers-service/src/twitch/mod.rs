pub mod client;

pub use client::{TwitchApi, TwitchClient};
