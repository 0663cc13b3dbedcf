// src/upstream/mod.rs

//! Network access to upstream release listings

mod client;

pub use client::UpstreamClient;
