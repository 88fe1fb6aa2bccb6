// docintegrity: near-duplicate sentence detection across document collections
//
// This is the library root. Each module corresponds to a stage of the
// duplicate check: reading documents, embedding words, comparing sentences,
// and reporting what was found.

pub mod compare;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod models;
pub mod output;
pub mod pipeline;
