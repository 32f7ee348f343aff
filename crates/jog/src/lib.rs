// Domain-driven module structure for the jog reformatter.

// Core pipeline stages
pub mod split;
pub mod record;
pub mod render;
pub mod emit;
pub mod pipeline;

// Boundary
pub mod cli;
