//! Resume analysis: a client-side core that gates submissions, drives one
//! analysis request at a time and parses the service's free-text reply into a
//! typed record, plus the analysis service that produces that reply.

pub mod analyze;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod llm_client;
pub mod routes;
pub mod session;
pub mod state;
