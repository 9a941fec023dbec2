//! Build a GraphStore from movie records.

use std::collections::HashSet;

use crate::model::MovieRecord;

use super::{GraphStore, NodeType, Relationship};

/// Populate a fresh store from `movies`.
///
/// All movie and person nodes are registered with their types before any
/// edge is added, so no node ends up untyped. Each credit becomes a forward
/// and an inverse edge.
pub fn build_graph(movies: &[MovieRecord]) -> GraphStore {
    let mut people: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for movie in movies {
        for person in movie.actors.iter().chain(movie.directors.iter()) {
            if seen.insert(person.name.as_str()) {
                people.push(person.name.as_str());
            }
        }
    }

    let credits: usize = movies.iter().map(|m| m.actors.len() + m.directors.len()).sum();
    let mut graph = GraphStore::with_capacity(movies.len() + people.len(), credits * 2);

    for movie in movies {
        graph.add_node(&movie.title, NodeType::Movie);
    }
    for name in &people {
        graph.add_node(name, NodeType::Person);
    }

    for movie in movies {
        for actor in &movie.actors {
            link(&mut graph, &actor.name, &movie.title, Relationship::ActedIn);
        }
        for director in &movie.directors {
            link(&mut graph, &director.name, &movie.title, Relationship::Directed);
        }
    }

    log::debug!(
        "Built graph from {} movies: {} nodes, {} edges",
        movies.len(),
        graph.node_count(),
        graph.edge_count()
    );

    graph
}

/// Add `person --rel--> movie` and its inverse.
fn link(graph: &mut GraphStore, person: &str, movie: &str, rel: Relationship) {
    graph.add_edge(person, movie, rel);
    graph.add_edge(movie, person, rel.inverse());
}
