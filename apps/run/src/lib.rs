#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

//! # Folio runner
//!
//! `run <command> [--flag]... [--flag=value]... [--flag="a|b"]...`
//!
//! Every command is a [`dispatch::HandlerDescriptor`]: a flag validation function, a main
//! function and embedded documentation. Handlers are registered explicitly in
//! [`dispatch::Registry::builtin`]; the [`dispatch::Dispatcher`] normalizes raw flags,
//! runs the handler's validation and then its main function.

pub mod cli;
pub mod dispatch;
pub mod handlers;
pub mod models;
pub mod services;
