//! Front end for the retrieval engine: corpus assembly from files and an HTTP client for
//! `irsim-server`.

pub mod client;
pub mod corpus;
