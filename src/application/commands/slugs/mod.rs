// src/application/commands/slugs/mod.rs
mod flush;
mod prepare;
mod service;

pub use service::SlugCommandService;
