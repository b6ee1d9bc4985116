//! Read-only access to the biomedical knowledge graph
//!
//! The analysis tools only ever see the [`GraphSource`] trait: query text in,
//! a list of [`Record`]s out.  [`Neo4jHttp`] implements it over the Neo4j HTTP
//! transactional endpoint, and [`query`] holds the parameterised queries used
//! by the tools.

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

mod config;
mod cypher;
mod neo4j;
pub mod query;
mod record;

pub use config::{connection_args, ConnectionConfig};
pub use cypher::{check_ident, quote_str};
pub use neo4j::Neo4jHttp;
pub use record::{Record, Value};

/// A read-only, synchronous, non-transactional source of query results
pub trait GraphSource {
    fn run_query(&self, query: &str) -> anyhow::Result<Vec<Record>>;
}
