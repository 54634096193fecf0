pub mod add_description;
pub mod create_person;
pub mod create_trait;
pub mod find_matches;
pub mod get_person;

use add_description::AddDescriptionParams;
use create_person::CreatePersonParams;
use create_trait::CreateTraitParams;
use find_matches::FindMatchesParams;
use get_person::GetPersonParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, ListResourceTemplatesResult, ListResourcesResult, PaginatedRequestParams,
    RawResource, RawResourceTemplate, ReadResourceRequestParams, ReadResourceResult, Resource,
    ResourceContents,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData, RoleServer, ServerHandler};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::MatcherConfig;
use crate::error::{MatchError, MatchResult};
use crate::personality::traits::TraitLimits;
use crate::personality::types::ScoreVector;
use crate::personality::{analyze, matching, persons, traits};

/// The traits-matcher MCP tool handler. Holds the two store handles and config,
/// and exposes every operation via the `#[tool_router]` macro. The listings are
/// also served as MCP resources.
///
/// Store work is synchronous and runs on the blocking pool. Each store's mutex
/// serializes writers; the trait lock is always released before the person
/// lock is taken.
#[derive(Clone)]
pub struct MatcherTools {
    tool_router: ToolRouter<Self>,
    persons: Arc<Mutex<Connection>>,
    traits: Arc<Mutex<Connection>>,
    config: Arc<MatcherConfig>,
}

#[tool_router]
impl MatcherTools {
    pub fn new(
        persons: Arc<Mutex<Connection>>,
        traits: Arc<Mutex<Connection>>,
        config: Arc<MatcherConfig>,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            persons,
            traits,
            config,
        }
    }

    /// Create a new person with a neutral personality score.
    #[tool(description = "Creates a new person with the given name and a neutral (0, 0) personality score.")]
    pub async fn create_person(
        &self,
        Parameters(params): Parameters<CreatePersonParams>,
    ) -> Result<String, String> {
        tracing::info!(person = %params.name, "create_person called");

        let db = Arc::clone(&self.persons);
        let max_name_len = self.config.scoring.max_name_len;
        let result = blocking(move || {
            let conn = lock(&db)?;
            persons::create_person(&conn, &params.name, max_name_len)
        })
        .await;

        respond("create_person", result)
    }

    /// Create a new personality trait.
    #[tool(description = "Creates a new personality trait with friendliness and dominance scores (-10 to 10). The trait name becomes a keyword matched in descriptions.")]
    pub async fn create_trait(
        &self,
        Parameters(params): Parameters<CreateTraitParams>,
    ) -> Result<String, String> {
        tracing::info!(name = %params.name, "create_trait called");

        let db = Arc::clone(&self.traits);
        let limits = TraitLimits {
            max_score: self.config.scoring.max_trait_score,
            max_name_len: self.config.scoring.max_name_len,
        };
        let result = blocking(move || {
            let conn = lock(&db)?;
            traits::create_trait(
                &conn,
                &params.name,
                ScoreVector::new(params.friendliness, params.dominance),
                limits,
            )
        })
        .await;

        respond("create_trait", result)
    }

    /// Scan a description for known traits and fold them into the person's score.
    #[tool(description = "Adds a description to a person. Known trait names found in the text are added to the person's personality score.")]
    pub async fn add_description(
        &self,
        Parameters(params): Parameters<AddDescriptionParams>,
    ) -> Result<String, String> {
        tracing::info!(
            person = %params.name,
            description_len = params.description.len(),
            "add_description called"
        );

        let persons_db = Arc::clone(&self.persons);
        let traits_db = Arc::clone(&self.traits);
        let scoring = self.config.scoring.clone();
        let result = blocking(move || {
            let vocabulary = traits::list_traits(&*lock(&traits_db)?)?;
            let mut conn = lock(&persons_db)?;
            analyze::add_description(
                &mut conn,
                &params.name,
                &params.description,
                &vocabulary,
                scoring.combine,
                scoring.max_description_len,
            )
        })
        .await;

        respond("add_description", result)
    }

    /// Rank all persons by closeness to a job description.
    #[tool(description = "Finds people matching a company's job description, ordered closest first by personality distance.")]
    pub async fn find_matches(
        &self,
        Parameters(params): Parameters<FindMatchesParams>,
    ) -> Result<String, String> {
        tracing::info!(company = %params.company_name, "find_matches called");

        let persons_db = Arc::clone(&self.persons);
        let traits_db = Arc::clone(&self.traits);
        let scoring = self.config.scoring.clone();
        let result = blocking(move || {
            if params.job_description.chars().count() > scoring.max_description_len {
                return Err(MatchError::invalid(format!(
                    "job description too long (max {} characters)",
                    scoring.max_description_len
                )));
            }
            let vocabulary = traits::list_traits(&*lock(&traits_db)?)?;
            let people = persons::list_persons(&*lock(&persons_db)?)?;
            Ok(matching::find_matches(
                &params.company_name,
                &params.job_description,
                &people,
                &vocabulary,
                scoring.combine,
                params.limit,
            ))
        })
        .await;

        respond("find_matches", result)
    }

    /// List every stored person with their current score.
    #[tool(description = "Lists all persons with their friendliness and dominance scores.")]
    pub async fn list_persons(&self) -> Result<String, String> {
        tracing::debug!("list_persons called");
        let db = Arc::clone(&self.persons);
        let result = blocking(move || persons::list_persons(&*lock(&db)?)).await;
        respond("list_persons", result)
    }

    /// List every stored trait.
    #[tool(description = "Lists all available personality traits.")]
    pub async fn list_traits(&self) -> Result<String, String> {
        tracing::debug!("list_traits called");
        let db = Arc::clone(&self.traits);
        let result = blocking(move || traits::list_traits(&*lock(&db)?)).await;
        respond("list_traits", result)
    }

    /// Fetch one person by name.
    #[tool(description = "Gets a person and their personality score by name.")]
    pub async fn get_person(
        &self,
        Parameters(params): Parameters<GetPersonParams>,
    ) -> Result<String, String> {
        tracing::debug!(person = %params.name, "get_person called");
        let db = Arc::clone(&self.persons);
        let result = blocking(move || persons::get_person(&*lock(&db)?, &params.name)).await;
        respond("get_person", result)
    }
}

const PERSONS_URI: &str = "persons://all";
const TRAITS_URI: &str = "traits://all";
const PERSON_URI_PREFIX: &str = "persons://";
const PERSON_URI_TEMPLATE: &str = "persons://{name}";

impl MatcherTools {
    /// JSON body behind a resource URI: `persons://all`, `traits://all` or
    /// `persons://{name}`.
    pub async fn read_resource_json(&self, uri: &str) -> MatchResult<String> {
        match uri {
            PERSONS_URI => {
                let db = Arc::clone(&self.persons);
                to_json(&blocking(move || persons::list_persons(&*lock(&db)?)).await?)
            }
            TRAITS_URI => {
                let db = Arc::clone(&self.traits);
                to_json(&blocking(move || traits::list_traits(&*lock(&db)?)).await?)
            }
            _ => match uri.strip_prefix(PERSON_URI_PREFIX) {
                Some(name) if !name.trim().is_empty() => {
                    let db = Arc::clone(&self.persons);
                    let name = name.to_string();
                    to_json(&blocking(move || persons::get_person(&*lock(&db)?, &name)).await?)
                }
                _ => Err(MatchError::invalid(format!("unknown resource: {uri}"))),
            },
        }
    }
}

#[tool_handler]
impl ServerHandler for MatcherTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Personality analysis and matching. Use create_trait to define keywords, \
                 create_person and add_description to score people, and find_matches to \
                 rank them against a job description. Read persons://all, traits://all \
                 or persons://{name} for the current data."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(vec![
            listed_resource(PERSONS_URI, "persons", "All persons with their personality scores"),
            listed_resource(TRAITS_URI, "traits", "All available personality traits"),
        ]))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        let template = RawResourceTemplate {
            uri_template: PERSON_URI_TEMPLATE.into(),
            name: "person".into(),
            title: None,
            description: Some("One person and their personality score".into()),
            mime_type: Some("application/json".into()),
            icons: None,
        };
        Ok(ListResourceTemplatesResult::with_all_items(vec![
            template.no_annotation(),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        tracing::debug!(uri = %request.uri, "read_resource called");
        let text = self
            .read_resource_json(&request.uri)
            .await
            .map_err(|e| resource_error(&request.uri, e))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: request.uri,
                mime_type: Some("application/json".into()),
                text,
                meta: None,
            }],
        })
    }
}

fn listed_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut resource = RawResource::new(uri, name);
    resource.description = Some(description.into());
    resource.mime_type = Some("application/json".into());
    resource.no_annotation()
}

/// Map a store error onto the MCP error carried by a failed resource read.
fn resource_error(uri: &str, e: MatchError) -> ErrorData {
    let data = serde_json::from_str(&e.to_json()).ok();
    match &e {
        MatchError::NotFound { .. } => {
            tracing::warn!(uri, error = %e, "resource not found");
            ErrorData::resource_not_found(e.to_string(), data)
        }
        MatchError::InvalidInput(_) | MatchError::DuplicateKey { .. } => {
            tracing::warn!(uri, error = %e, "resource request rejected");
            ErrorData::invalid_params(e.to_string(), data)
        }
        MatchError::Storage(_) | MatchError::Unavailable(_) => {
            tracing::error!(uri, error = %e, "resource read failed");
            ErrorData::internal_error(e.to_string(), data)
        }
    }
}

fn lock(db: &Mutex<Connection>) -> MatchResult<MutexGuard<'_, Connection>> {
    db.lock()
        .map_err(|e| MatchError::Unavailable(format!("db lock poisoned: {e}")))
}

/// Run synchronous store work on the blocking pool.
async fn blocking<T, F>(f: F) -> MatchResult<T>
where
    F: FnOnce() -> MatchResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| MatchError::Unavailable(format!("db task failed: {e}")))?
}

fn to_json<T: Serialize>(value: &T) -> MatchResult<String> {
    serde_json::to_string(value)
        .map_err(|e| MatchError::Unavailable(format!("serialization failed: {e}")))
}

/// Serialize a success as JSON, or turn the error into the JSON error body.
fn respond<T: Serialize>(op: &str, result: MatchResult<T>) -> Result<String, String> {
    match result {
        Ok(value) => to_json(&value).map_err(|e| e.to_json()),
        Err(e @ (MatchError::Storage(_) | MatchError::Unavailable(_))) => {
            tracing::error!(op, error = %e, "storage error");
            Err(e.to_json())
        }
        Err(e) => {
            tracing::warn!(op, kind = e.kind(), error = %e, "request rejected");
            Err(e.to_json())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_memory_database, StoreKind};

    fn test_tools() -> MatcherTools {
        let persons = open_memory_database(StoreKind::Persons).unwrap();
        let traits = open_memory_database(StoreKind::Traits).unwrap();
        MatcherTools::new(
            Arc::new(Mutex::new(persons)),
            Arc::new(Mutex::new(traits)),
            Arc::new(MatcherConfig::default()),
        )
    }

    fn error_kind(body: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        value["error"].as_str().unwrap().to_string()
    }

    async fn create_trait(tools: &MatcherTools, name: &str, f: f64, d: f64) {
        tools
            .create_trait(Parameters(CreateTraitParams {
                name: name.into(),
                friendliness: f,
                dominance: d,
            }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_person_then_duplicate() {
        let tools = test_tools();
        let params = || Parameters(CreatePersonParams { name: "John Doe".into() });

        let ok = tools.create_person(params()).await.unwrap();
        let person: serde_json::Value = serde_json::from_str(&ok).unwrap();
        assert_eq!(person["name"], "John Doe");
        assert_eq!(person["friendliness"], 0.0);

        let err = tools.create_person(params()).await.unwrap_err();
        assert_eq!(error_kind(&err), "duplicate_key");
    }

    #[tokio::test]
    async fn add_description_updates_score() {
        let tools = test_tools();
        create_trait(&tools, "friendly", 8.0, 2.0).await;
        tools
            .create_person(Parameters(CreatePersonParams { name: "A".into() }))
            .await
            .unwrap();

        let out = tools
            .add_description(Parameters(AddDescriptionParams {
                name: "A".into(),
                description: "very friendly person".into(),
            }))
            .await
            .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["updated"], true);
        assert_eq!(out["score"]["friendliness"], 8.0);
        assert_eq!(out["score"]["dominance"], 2.0);
    }

    #[tokio::test]
    async fn add_description_unknown_person() {
        let tools = test_tools();
        let err = tools
            .add_description(Parameters(AddDescriptionParams {
                name: "Ghost".into(),
                description: "text".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), "not_found");
    }

    #[tokio::test]
    async fn invalid_trait_score_rejected() {
        let tools = test_tools();
        let err = tools
            .create_trait(Parameters(CreateTraitParams {
                name: "huge".into(),
                friendliness: 50.0,
                dominance: 0.0,
            }))
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), "invalid_input");
    }

    #[tokio::test]
    async fn find_matches_ranks_and_limits() {
        let tools = test_tools();
        create_trait(&tools, "friendly", 8.0, 2.0).await;
        create_trait(&tools, "dominant", 1.0, 9.0).await;
        for (name, text) in [("A", "friendly"), ("B", "dominant"), ("C", "")] {
            tools
                .create_person(Parameters(CreatePersonParams { name: name.into() }))
                .await
                .unwrap();
            tools
                .add_description(Parameters(AddDescriptionParams {
                    name: name.into(),
                    description: text.into(),
                }))
                .await
                .unwrap();
        }

        let out = tools
            .find_matches(Parameters(FindMatchesParams {
                company_name: "Acme Corp".into(),
                job_description: "We want someone friendly".into(),
                limit: Some(2),
            }))
            .await
            .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["company"], "Acme Corp");
        let names: Vec<&str> = out["matches"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        // C sits at the origin: distance sqrt(68) ~ 8.25 beats B's sqrt(98) ~ 9.90
        assert_eq!(names, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn find_matches_on_empty_store() {
        let tools = test_tools();
        let out = tools
            .find_matches(Parameters(FindMatchesParams {
                company_name: "Acme".into(),
                job_description: "anything".into(),
                limit: None,
            }))
            .await
            .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(out["matches"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listings_and_get_person() {
        let tools = test_tools();
        create_trait(&tools, "calm", 3.0, -1.0).await;
        tools
            .create_person(Parameters(CreatePersonParams { name: "Jane".into() }))
            .await
            .unwrap();

        let traits: serde_json::Value =
            serde_json::from_str(&tools.list_traits().await.unwrap()).unwrap();
        assert_eq!(traits.as_array().unwrap().len(), 1);
        assert_eq!(traits[0]["name"], "calm");

        let persons: serde_json::Value =
            serde_json::from_str(&tools.list_persons().await.unwrap()).unwrap();
        assert_eq!(persons[0]["name"], "Jane");

        let err = tools
            .get_person(Parameters(GetPersonParams { name: "Nobody".into() }))
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), "not_found");
    }

    #[tokio::test]
    async fn find_matches_rejects_long_job_description() {
        let tools = test_tools();
        let err = tools
            .find_matches(Parameters(FindMatchesParams {
                company_name: "Acme".into(),
                job_description: "x".repeat(1001),
                limit: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(error_kind(&err), "invalid_input");
    }

    #[tokio::test]
    async fn resources_expose_listings() {
        let tools = test_tools();
        create_trait(&tools, "calm", 3.0, -1.0).await;
        tools
            .create_person(Parameters(CreatePersonParams { name: "Jane Smith".into() }))
            .await
            .unwrap();

        let persons: serde_json::Value =
            serde_json::from_str(&tools.read_resource_json("persons://all").await.unwrap())
                .unwrap();
        assert_eq!(persons.as_array().unwrap().len(), 1);
        assert_eq!(persons[0]["name"], "Jane Smith");

        let traits: serde_json::Value =
            serde_json::from_str(&tools.read_resource_json("traits://all").await.unwrap())
                .unwrap();
        assert_eq!(traits[0]["name"], "calm");

        let jane: serde_json::Value =
            serde_json::from_str(&tools.read_resource_json("persons://Jane Smith").await.unwrap())
                .unwrap();
        assert_eq!(jane["friendliness"], 0.0);
    }

    #[tokio::test]
    async fn unknown_resources_are_errors() {
        let tools = test_tools();
        let err = tools.read_resource_json("persons://Nobody").await.unwrap_err();
        assert_eq!(err.kind(), "not_found");

        let err = tools.read_resource_json("jobs://all").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        let err = tools.read_resource_json("persons://").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn resource_errors_map_to_mcp_codes() {
        let err = resource_error(
            "persons://Ghost",
            MatchError::not_found(crate::error::Entity::Person, "Ghost"),
        );
        assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(err.data.unwrap()["error"], "not_found");
    }
}
