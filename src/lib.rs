pub mod config;
pub mod error;
pub mod db;
pub mod model;
pub mod graph;
pub mod service;
pub mod http;

pub use config::Config;
pub use error::{MovieGraphError, Result};
pub use graph::{build_graph, GraphStore, NodeType, Relationship};
pub use model::{MovieRecord, PersonRecord};
pub use service::{AddActorRequest, GraphService};
