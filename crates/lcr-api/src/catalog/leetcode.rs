use std::time::Duration;

use async_trait::async_trait;
use lcr_db::models::Difficulty;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{CatalogClient, CatalogError, ProblemMetadata};

const SEARCH_QUERY: &str = r#"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList: questionList(categorySlug: $categorySlug, limit: $limit, skip: $skip, filters: $filters) {
    questions: data {
      questionFrontendId
      title
      titleSlug
      difficulty
      topicTags { name }
    }
  }
}
"#;

const QUESTION_QUERY: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionFrontendId
    title
    titleSlug
    difficulty
    topicTags { name }
  }
}
"#;

/// Keyword search matches titles too, so fetch a few candidates and pick the exact number.
const SEARCH_LIMIT: u32 = 20;

/// LeetCode GraphQL catalog
#[derive(Debug, Clone)]
pub struct LeetCodeCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl LeetCodeCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lcr-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, CatalogError> {
        let url = format!("{}/graphql", self.base_url);
        debug!(%url, "Catalog GraphQL request");

        let response = self
            .client
            .post(&url)
            .header("Referer", format!("{}/problemset/", self.base_url))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for LeetCodeCatalog {
    async fn search_by_id(&self, frontend_id: u32) -> Result<Option<ProblemMetadata>, CatalogError> {
        let body = self
            .graphql(
                SEARCH_QUERY,
                json!({
                    "categorySlug": "",
                    "skip": 0,
                    "limit": SEARCH_LIMIT,
                    "filters": { "searchKeywords": frontend_id.to_string() },
                }),
            )
            .await?;

        parse_search_response(&body, frontend_id, &self.base_url)
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<ProblemMetadata>, CatalogError> {
        let body = self
            .graphql(QUESTION_QUERY, json!({ "titleSlug": slug }))
            .await?;

        parse_question_response(&body, &self.base_url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question_frontend_id: String,
    title: String,
    title_slug: String,
    difficulty: Difficulty,
    #[serde(default)]
    topic_tags: Vec<RawTopicTag>,
}

#[derive(Debug, Deserialize)]
struct RawTopicTag {
    name: String,
}

impl RawQuestion {
    fn into_metadata(self, base_url: &str) -> Result<ProblemMetadata, CatalogError> {
        let frontend_id = self.question_frontend_id.parse().map_err(|_| {
            CatalogError::Parse(format!(
                "non-numeric question id '{}'",
                self.question_frontend_id
            ))
        })?;

        Ok(ProblemMetadata {
            frontend_id,
            url: format!("{base_url}/problems/{}/", self.title_slug),
            title: self.title,
            slug: self.title_slug,
            difficulty: self.difficulty,
            topics: self.topic_tags.into_iter().map(|tag| tag.name).collect(),
        })
    }
}

/// GraphQL `errors[].message`, joined, if the response carries any.
fn upstream_errors(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    let messages = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect::<Vec<_>>();
    (!messages.is_empty()).then(|| messages.join("; "))
}

fn missing(body: &Value, path: &str) -> CatalogError {
    upstream_errors(body)
        .map_or_else(|| CatalogError::Parse(format!("missing {path}")), CatalogError::Upstream)
}

fn parse_question_response(
    body: &Value,
    base_url: &str,
) -> Result<Option<ProblemMetadata>, CatalogError> {
    match body.pointer("/data/question") {
        Some(Value::Null) => Ok(None),
        Some(question) => {
            let raw = RawQuestion::deserialize(question)
                .map_err(|e| CatalogError::Parse(e.to_string()))?;
            raw.into_metadata(base_url).map(Some)
        }
        None => Err(missing(body, "data.question")),
    }
}

fn parse_search_response(
    body: &Value,
    frontend_id: u32,
    base_url: &str,
) -> Result<Option<ProblemMetadata>, CatalogError> {
    let questions = match body.pointer("/data/problemsetQuestionList/questions") {
        Some(Value::Null) => return Ok(None),
        Some(questions) => Vec::<RawQuestion>::deserialize(questions)
            .map_err(|e| CatalogError::Parse(e.to_string()))?,
        None => return Err(missing(body, "data.problemsetQuestionList.questions")),
    };

    let wanted = frontend_id.to_string();
    questions
        .into_iter()
        .find(|q| q.question_frontend_id == wanted)
        .map(|q| q.into_metadata(base_url))
        .transpose()
}
