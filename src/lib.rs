//! # Research Agent
//!
//! A single-page web tool that researches a company and a job role.
//!
//! This library provides:
//! - An HTTP UI for submitting a company name and job role
//! - A tool-based agent loop that delegates reasoning to Gemini
//! - A Tavily-backed web search tool for grounding the summary
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a research request via the page's trigger
//! 2. Build the deterministic research instruction
//! 3. Call the LLM, execute any search calls it asks for
//! 4. Feed results back until it produces the final summary
//!
//! Each trigger is one synchronous round trip; nothing is persisted
//! across requests.
//!
//! ## Example
//!
//! ```rust,ignore
//! use research_agent::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let secrets = config.secrets.clone().expect("keys present");
//! let agent = Agent::new(&config, &secrets);
//! let run = agent.invoke("Research the company 'Acme Corp' ...").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod markdown;
pub mod tools;

pub use config::Config;
