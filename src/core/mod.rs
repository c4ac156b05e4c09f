pub mod config;
pub mod controller;
pub mod counters;
pub mod error;
pub mod event;
pub mod formatter;
pub mod interval;
pub mod job;
pub mod runner;
