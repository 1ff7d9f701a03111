#![forbid(unsafe_code)]

//! Tessel demo: the widget tree and command-line handling behind the
//! `tessel-demo` binary.

pub mod app;
pub mod cli;
