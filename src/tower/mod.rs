//! Tower API interaction module
//!
//! Core plumbing for talking to an Ansible Tower/AWX REST endpoint:
//!
//! - [`creds`] - API credentials and TLS verification policy
//! - [`client`] - HTTP session wrapper with bearer auth and 5xx retry

pub mod client;
pub mod creds;
