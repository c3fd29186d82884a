mod client;
mod links;
mod provider;
mod types;

pub use client::ConcourseClient;
pub use provider::ConcourseProvider;
