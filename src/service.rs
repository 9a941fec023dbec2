//! Graph service: rebuilds the graph from the movie store for every query.
//!
//! No store outlives a call, so concurrent queries never observe each
//! other's builds. Actor insertion validates against a fresh build and then
//! writes through to the movie store, so the next rebuild includes it.

use serde::Deserialize;

use crate::db::MovieRepository;
use crate::error::Result;
use crate::graph::{
    self, build_graph, AddActorOutcome, Edge, GraphStore, GraphSummary, NodeInfo, NodeType,
    TraversalComparison, VisualizationData,
};

/// Body of an actor insertion request. Missing fields deserialize as empty
/// and are rejected by validation, not by the parser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddActorRequest {
    #[serde(default)]
    pub actor_name: String,
    #[serde(default)]
    pub movie_titles: Vec<String>,
}

impl AddActorRequest {
    pub fn new<I, S>(actor_name: impl Into<String>, movie_titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actor_name: actor_name.into(),
            movie_titles: movie_titles.into_iter().map(Into::into).collect(),
        }
    }

    /// The trimmed actor name, or the failure to report. Titles are matched
    /// exactly as given.
    fn validate(&self) -> std::result::Result<String, AddActorOutcome> {
        let name = self.actor_name.trim();
        if name.is_empty() {
            return Err(AddActorOutcome::failure("Actor name is required"));
        }
        if self.movie_titles.is_empty() {
            return Err(AddActorOutcome::failure("At least one movie title is required"));
        }
        Ok(name.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GraphService {
    repo: MovieRepository,
}

impl GraphService {
    pub fn new(repo: MovieRepository) -> Self {
        Self { repo }
    }

    /// Fetch all records and build a fresh graph.
    pub async fn build(&self) -> Result<GraphStore> {
        let movies = self.repo.find_all().await?;
        Ok(build_graph(&movies))
    }

    pub async fn info(&self) -> Result<GraphSummary> {
        Ok(self.build().await?.summary())
    }

    pub async fn nodes(&self) -> Result<Vec<String>> {
        Ok(self.build().await?.all_nodes())
    }

    /// Nodes of the named type (case-insensitive). Unknown type names match nothing.
    pub async fn nodes_by_type(&self, type_name: &str) -> Result<Vec<String>> {
        let graph = self.build().await?;
        Ok(match NodeType::parse(type_name) {
            Some(node_type) => graph.nodes_by_type(node_type),
            None => {
                log::debug!("Unknown node type '{}'", type_name);
                Vec::new()
            }
        })
    }

    pub async fn movies(&self) -> Result<Vec<String>> {
        Ok(self.build().await?.nodes_by_type(NodeType::Movie))
    }

    pub async fn actors(&self) -> Result<Vec<String>> {
        Ok(self.build().await?.nodes_by_type(NodeType::Person))
    }

    pub async fn neighbors(&self, id: &str) -> Result<Vec<String>> {
        Ok(self.build().await?.neighbors(id).to_vec())
    }

    pub async fn edges(&self) -> Result<Vec<Edge>> {
        Ok(self.build().await?.edges().to_vec())
    }

    pub async fn node_info(&self, id: &str) -> Result<NodeInfo> {
        Ok(self.build().await?.node_info(id))
    }

    pub async fn dfs(&self, start: &str) -> Result<Vec<String>> {
        Ok(graph::dfs(&self.build().await?, start))
    }

    pub async fn dfs_iterative(&self, start: &str) -> Result<Vec<String>> {
        Ok(graph::dfs_iterative(&self.build().await?, start))
    }

    pub async fn bfs(&self, start: &str) -> Result<Vec<String>> {
        Ok(graph::bfs(&self.build().await?, start))
    }

    pub async fn shortest_path(&self, start: &str, end: &str) -> Result<Vec<String>> {
        Ok(graph::shortest_path(&self.build().await?, start, end))
    }

    pub async fn compare_traversals(&self, start: &str) -> Result<TraversalComparison> {
        Ok(graph::compare_traversals(&self.build().await?, start))
    }

    pub async fn graph_string(&self) -> Result<String> {
        Ok(self.build().await?.to_string())
    }

    pub async fn visualization(&self) -> Result<VisualizationData> {
        Ok(self.build().await?.to_visualization())
    }

    /// Insert an actor and persist the resolved credits.
    ///
    /// Validation failures come back as `Ok` with `success: false`; only
    /// data-store failures are errors.
    pub async fn add_actor(&self, request: &AddActorRequest) -> Result<AddActorOutcome> {
        let name = match request.validate() {
            Ok(name) => name,
            Err(outcome) => return Ok(outcome),
        };

        let mut graph = self.build().await?;
        let outcome = graph.insert_actor(&name, &request.movie_titles);
        if !outcome.success {
            log::info!("Actor insertion rejected: {}", outcome.message);
            return Ok(outcome);
        }

        match self.repo.add_actor(&name, &outcome.linked_movies).await? {
            Some(_) => Ok(outcome),
            // Another request stored the same name since our build.
            None => Ok(AddActorOutcome::failure(format!(
                "Actor '{}' already exists in the graph",
                name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrate, Db};
    use crate::model::MovieRecord;
    use tempfile::TempDir;

    async fn setup_service(records: Vec<MovieRecord>) -> (GraphService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));
        db.with_connection(migrate::run_migrations).await.unwrap();
        let repo = MovieRepository::new(db);
        repo.import(records).await.unwrap();
        (GraphService::new(repo), temp_dir)
    }

    fn inception() -> Vec<MovieRecord> {
        vec![MovieRecord::new("Inception")
            .with_actors(["Leonardo DiCaprio"])
            .with_directors(["Christopher Nolan"])]
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[tokio::test]
    async fn test_info_and_listings() {
        let (service, _temp) = setup_service(inception()).await;

        let info = service.info().await.unwrap();
        assert_eq!(info.node_count, 3);
        assert_eq!(info.edge_count, 4);
        assert!(!info.is_empty);

        assert_eq!(
            sorted(service.nodes().await.unwrap()),
            vec!["Christopher Nolan", "Inception", "Leonardo DiCaprio"]
        );
        assert_eq!(service.movies().await.unwrap(), vec!["Inception"]);
        assert_eq!(
            sorted(service.actors().await.unwrap()),
            vec!["Christopher Nolan", "Leonardo DiCaprio"]
        );
        assert_eq!(service.nodes_by_type("movie").await.unwrap(), vec!["Inception"]);
        assert!(service.nodes_by_type("studio").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let (service, _temp) = setup_service(Vec::new()).await;
        let info = service.info().await.unwrap();
        assert!(info.is_empty);
        assert!(service.bfs("Inception").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_traversals_through_service() {
        let (service, _temp) = setup_service(inception()).await;

        assert_eq!(
            service.dfs("Inception").await.unwrap(),
            vec!["Inception", "Leonardo DiCaprio", "Christopher Nolan"]
        );
        assert_eq!(
            service.dfs_iterative("Inception").await.unwrap(),
            vec!["Inception", "Christopher Nolan", "Leonardo DiCaprio"]
        );
        assert_eq!(
            service.shortest_path("Leonardo DiCaprio", "Christopher Nolan").await.unwrap(),
            vec!["Leonardo DiCaprio", "Inception", "Christopher Nolan"]
        );
        assert!(service.dfs("Nobody").await.unwrap().is_empty());
        assert!(service.neighbors("Nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_actor_persists_across_rebuilds() {
        let (service, _temp) = setup_service(inception()).await;

        let outcome = service
            .add_actor(&AddActorRequest::new("Tom Hanks", ["Inception", "Unknown Movie"]))
            .await
            .unwrap();
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.added_relations, Some(1));

        // Every read rebuilds; the insertion must still be there.
        assert_eq!(service.neighbors("Tom Hanks").await.unwrap(), vec!["Inception"]);
        assert_eq!(service.info().await.unwrap().edge_count, 6);
    }

    #[tokio::test]
    async fn test_add_actor_no_valid_movies() {
        let (service, _temp) = setup_service(inception()).await;

        let outcome = service
            .add_actor(&AddActorRequest::new("Tom Hanks", ["Unknown Movie"]))
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.contains("No valid movies"));
        assert!(!service.nodes().await.unwrap().contains(&"Tom Hanks".to_string()));
    }

    #[tokio::test]
    async fn test_add_actor_twice_reports_existing() {
        let (service, _temp) = setup_service(inception()).await;
        let request = AddActorRequest::new("Tom Hanks", ["Inception"]);

        assert!(service.add_actor(&request).await.unwrap().success);
        let second = service.add_actor(&request).await.unwrap();
        assert!(!second.success);
        assert!(second.message.contains("already exists"));
    }

    #[tokio::test]
    async fn test_add_actor_validation() {
        let (service, _temp) = setup_service(inception()).await;

        let blank = service
            .add_actor(&AddActorRequest::new("   ", ["Inception"]))
            .await
            .unwrap();
        assert!(!blank.success);
        assert!(blank.message.contains("name is required"));

        let no_movies = service
            .add_actor(&AddActorRequest::new("Tom Hanks", Vec::<String>::new()))
            .await
            .unwrap();
        assert!(!no_movies.success);
        assert!(no_movies.message.contains("movie title"));
    }

    #[tokio::test]
    async fn test_add_actor_trims_name() {
        let (service, _temp) = setup_service(inception()).await;
        let outcome = service
            .add_actor(&AddActorRequest::new("  Tom Hanks ", ["Inception"]))
            .await
            .unwrap();
        assert_eq!(outcome.actor_name.as_deref(), Some("Tom Hanks"));
        assert!(service.nodes().await.unwrap().contains(&"Tom Hanks".to_string()));
    }

    #[tokio::test]
    async fn test_add_actor_matches_titles_verbatim() {
        let (service, _temp) = setup_service(vec![
            MovieRecord::new(" Padded Title ").with_actors(["Someone"]),
        ])
        .await;

        let blank = service
            .add_actor(&AddActorRequest::new("Tom Hanks", ["  "]))
            .await
            .unwrap();
        assert!(!blank.success);
        assert!(blank.message.contains("No valid movies"));

        let trimmed = service
            .add_actor(&AddActorRequest::new("Tom Hanks", ["Padded Title"]))
            .await
            .unwrap();
        assert!(!trimmed.success);

        let exact = service
            .add_actor(&AddActorRequest::new("Tom Hanks", [" Padded Title "]))
            .await
            .unwrap();
        assert!(exact.success, "{}", exact.message);
        assert_eq!(service.neighbors("Tom Hanks").await.unwrap(), vec![" Padded Title "]);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let service = GraphService::new(MovieRepository::new(Db::new(temp_dir.path().join("no_schema.db"))));
        assert!(service.info().await.is_err());
        assert!(service
            .add_actor(&AddActorRequest::new("Tom Hanks", ["Inception"]))
            .await
            .is_err());
    }

    #[test]
    fn test_request_deserialize_missing_fields() {
        let request: AddActorRequest = serde_json::from_str(r#"{"actorName": "Tom Hanks"}"#).unwrap();
        assert_eq!(request.actor_name, "Tom Hanks");
        assert!(request.movie_titles.is_empty());
        assert!(request.validate().is_err());
    }
}
