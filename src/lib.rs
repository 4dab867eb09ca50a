pub mod config;
pub mod dataframeutils;
pub mod error;
pub mod filter;
pub mod interactions;
pub mod io;
pub mod metrics;
pub mod userknn;
