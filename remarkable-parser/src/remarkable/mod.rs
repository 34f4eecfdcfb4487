//! Main module for remarkable library functionality

pub mod assembling;
pub mod document;
pub mod graph;
pub mod lexing;
pub mod loader;
pub mod options;
pub mod resolving;
pub mod token;
pub mod transforms;
