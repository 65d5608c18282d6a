// ABOUTME: LLM module - client abstraction for language model providers.
// ABOUTME: Defines types, the client trait, the OpenAI provider and a scripted client.

mod client;
mod openai;
mod scripted;
mod types;

pub use client::*;
pub use openai::*;
pub use scripted::ScriptedClient;
pub use types::*;

#[cfg(test)]
mod types_test;
