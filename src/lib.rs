pub mod config;
pub mod error;
pub mod mail;
pub mod market;
pub mod monitoring;
pub mod news;
pub mod report;
