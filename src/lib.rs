// lib.rs - Library root for the drafty document backend

pub mod buffer;
pub mod cli;
pub mod config;
pub mod formatting;
pub mod margin;
pub mod run;
pub mod service;
pub mod store;
