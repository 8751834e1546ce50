// src/models/mod.rs

pub mod lesson;
pub mod module;
pub mod profile;
pub mod progress;
