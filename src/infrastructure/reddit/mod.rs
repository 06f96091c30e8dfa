//! Reddit content adapter.

mod client;
mod dto;

pub use client::RedditClient;
