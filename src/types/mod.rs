// Eternal History shared type definitions
// Each submodule defines types used across the storage core and its surfaces.

pub mod errors;
pub mod history;
pub mod node;
pub mod query;
pub mod settings;
