//! Scripts for deploying and wiring up the governance contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
mod solidity;
pub mod types;
pub mod utils;
