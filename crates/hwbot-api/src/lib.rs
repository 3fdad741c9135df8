//! # Homework API
//! Client for the homework review status endpoint.

pub mod client;

pub use client::PracticumClient;
