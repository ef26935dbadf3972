//! Dytty Engine - two-pass ytt orchestration
//!
//! This crate drives the external templating engine:
//! - `ResolutionEngine`: values pass, template resolution, render pass
//! - `TemplatingGateway`: the boundary to the engine
//! - `YttGateway`: runs the `ytt` executable
//! - `MockGateway`: canned responses for tests

pub mod error;
pub mod gateway;
pub mod mock;
pub mod resolver;
pub mod ytt;

pub use error::{EngineError, Result};
pub use gateway::{Mode, TemplatingGateway};
pub use mock::{Invocation, MockGateway};
pub use resolver::{EffectiveValues, ResolutionEngine};
pub use ytt::YttGateway;
