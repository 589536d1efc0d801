//! cephwatch-query — read-only monitor queries with host failover.
//!
//! A query is one of exactly two whitelisted commands (`ceph status`,
//! `ceph osd tree`), run over SSH against an ordered list of monitor
//! hosts. Hosts are tried strictly in order and the first decodable
//! response wins; a host is never retried within one invocation.
//!
//! ```text
//! QueryExecutor::execute(query, config)
//!   ├── mon-1: ssh ceph@mon-1 'ceph status --format=json'  → failed
//!   ├── mon-2: …                                           → failed
//!   └── mon-3: …                                           → decoded, done
//! ```

pub mod error;
pub mod executor;
pub mod transport;

pub use error::{AttemptError, QueryError, QueryResult};
pub use executor::{MonQuery, QueryExecutor};
pub use transport::{SshTransport, Transport};
