//! Main library for statusline, used by its CLI.
//!
//! The pipeline is: resolve a working directory ([`input`]), collect the
//! repository state by shelling out to git ([`repo`]), then format it as a
//! single line ([`render`]).

pub mod config;
pub mod fetch;
pub mod git;
pub mod input;
pub mod render;
pub mod repo;
pub mod status;
