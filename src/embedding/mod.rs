// Word embeddings: model registry, download cache, vector table, and
// word mover's distance.

pub mod download;
pub mod registry;
pub mod traits;
pub mod vectors;
pub mod wmd;
