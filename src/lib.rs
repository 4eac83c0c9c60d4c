pub mod api;
pub mod cache;
pub mod calendar;
pub mod cli;
pub mod core;
pub mod holidays;
pub mod ip;
pub mod tools;
pub mod weather;
