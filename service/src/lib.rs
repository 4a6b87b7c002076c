#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod ask;
pub mod config;
pub mod entity;
pub mod error;
pub mod geocoder;
pub mod http;
pub mod matching;
pub mod rest;
pub mod roster;
pub mod state;
pub mod states;
pub mod upstream;
