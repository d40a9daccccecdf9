//! Utility-class engine: resolves a Tailwind-style config into a class dictionary and exposes
//! the class serializer, composer and CSS generator the twstyled pipeline consumes.

pub mod attributes;
mod cache;
pub mod classes;
mod config;
mod dictionary;
mod engine;
mod error;
pub mod escape;
mod generator;
mod theme;

pub use cache::*;
pub use config::*;
pub use dictionary::*;
pub use engine::*;
pub use error::*;
pub use theme::*;
