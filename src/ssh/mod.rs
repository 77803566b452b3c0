pub mod auth;
pub mod client;
pub mod connection;
pub mod error;
pub mod known_hosts;

pub use client::{ConnectionConfig, SshClient};
pub use error::Error;
pub use known_hosts::HostKeyPolicy;
