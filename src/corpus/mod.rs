// Corpus construction: finding documents and turning them into sentences.

pub mod extract;
pub mod loader;
pub mod sentences;
