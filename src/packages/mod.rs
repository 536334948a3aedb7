// src/packages/mod.rs

//! Package descriptions from the local winget tool
//!
//! [`show`] turns `winget show` text into a [`crate::model::PackageDescriptor`];
//! [`winget`] runs the tool.

pub mod show;
pub mod winget;

pub use show::parse_show_output;
pub use winget::{CommandOutput, CommandRunner, SystemCommandRunner, WingetCli};
