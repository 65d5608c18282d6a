// ABOUTME: Root module for crewrelay - plan, compile and run agent crews from a mission.
// ABOUTME: Re-exports all public types from submodules.

pub mod agent;
pub mod config;
pub mod crew;
pub mod error;
pub mod hook;
pub mod llm;
pub mod plan;
pub mod prelude;
pub mod relay;
pub mod tool;
pub mod tools;

pub use error::RelayError;
