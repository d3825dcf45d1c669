#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;

pub mod browser_controller;
pub mod crawler;
pub mod fetcher;
pub mod links;
pub mod session;
pub mod types;
pub mod waiter;
