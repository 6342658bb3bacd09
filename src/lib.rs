// lib.rs - Library root for the lucid-indent engine

pub mod buffer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod grammar;
pub mod indenter;
pub mod line_index;
