//! Course catalog and question bank backed by a Firebase realtime database.
//!
//! Data is read through the REST interface: `GET {db}/{path}.json`, with an
//! optional `auth` token. Collections come back either as objects keyed by
//! id or as arrays (for numeric keys), and `null` for paths that do not exist.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use eduflex_core::catalog::DEFAULT_COURSE_LIMIT;
use eduflex_core::error::CoreResult;
use eduflex_core::model::{CourseEntry, Question};
use eduflex_core::subjects::{path_key, Subject};
use eduflex_core::traits::{CatalogQuery, CourseCatalog, QuestionBank};

use crate::error::{check_status, ProviderError};

/// Shared REST plumbing for both collaborators.
struct RealtimeDb {
    db_url: String,
    auth_token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl RealtimeDb {
    fn new(db_url: &str, auth_token: Option<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            db_url: db_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.filter(|t| !t.is_empty()),
            timeout_secs,
            client,
        })
    }

    fn url(&self, segments: &[&str], shallow: bool) -> Result<reqwest::Url, ProviderError> {
        let path = segments
            .iter()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        let raw = format!("{}/{path}.json", self.db_url);
        let mut url = reqwest::Url::parse(&raw).map_err(|e| ProviderError::InvalidUrl(format!("{raw}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(token) = &self.auth_token {
                query.append_pair("auth", token);
            }
            if shallow {
                query.append_pair("shallow", "true");
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get(&self, segments: &[&str], shallow: bool) -> Result<Value, ProviderError> {
        let url = self.url(segments, shallow)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.timeout_secs))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse database JSON: {e}")))
    }
}

/// Children of a collection node, in the database's key order.
fn children(value: Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Course records stored under one database path.
pub struct FirebaseCatalog {
    db: RealtimeDb,
    path: String,
    limit: usize,
}

impl FirebaseCatalog {
    pub fn new(
        db_url: &str,
        path: &str,
        auth_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            db: RealtimeDb::new(db_url, auth_token, timeout_secs)?,
            path: path.to_string(),
            limit: DEFAULT_COURSE_LIMIT,
        })
    }

    /// Cap the number of courses returned per query. Zero is treated as one.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Every readable course under the catalog path. Malformed records are skipped.
    pub async fn all_courses(&self) -> Result<Vec<CourseEntry>, ProviderError> {
        let value = self.db.get(&[self.path.as_str()], false).await?;
        Ok(children(value)
            .into_iter()
            .filter_map(|(id, record)| match serde_json::from_value::<CourseEntry>(record) {
                Ok(course) => Some(course),
                Err(e) => {
                    tracing::warn!(id = %id, "skipping malformed course record: {e}");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl CourseCatalog for FirebaseCatalog {
    fn name(&self) -> &str {
        "firebase"
    }

    /// Course records carry no level data.
    fn supports_tiers(&self) -> bool {
        false
    }

    #[instrument(skip(self), fields(path = %self.path))]
    async fn courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseEntry>> {
        let wanted = Subject::standardize(&query.subject);
        Ok(self
            .all_courses()
            .await?
            .into_iter()
            .filter(|c| Subject::standardize(&c.category) == wanted)
            .filter(|c| query.tier.is_none_or(|t| c.matches_tier(t)))
            .take(self.limit)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StoredQuestion {
    question: String,
    #[serde(default, alias = "options")]
    choices: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
}

/// Question sets stored at `{root}/{subject-key}/questions`.
pub struct FirebaseQuestionBank {
    db: RealtimeDb,
    root: String,
}

impl FirebaseQuestionBank {
    pub fn new(
        db_url: &str,
        root: &str,
        auth_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            db: RealtimeDb::new(db_url, auth_token, timeout_secs)?,
            root: root.to_string(),
        })
    }
}

#[async_trait]
impl QuestionBank for FirebaseQuestionBank {
    fn name(&self) -> &str {
        "firebase"
    }

    #[instrument(skip(self), fields(root = %self.root))]
    async fn subjects(&self) -> CoreResult<Vec<String>> {
        let value = self.db.get(&[self.root.as_str()], true).await?;
        Ok(children(value).into_iter().map(|(key, _)| key).collect())
    }

    #[instrument(skip(self), fields(root = %self.root))]
    async fn quiz(&self, subject: &str) -> CoreResult<Vec<Question>> {
        let key = path_key(subject);
        let value = self.db.get(&[self.root.as_str(), key.as_str(), "questions"], false).await?;
        if value.is_null() {
            tracing::warn!(subject, "no questions stored for subject");
        }

        Ok(children(value)
            .into_iter()
            .filter_map(|(id, record)| match serde_json::from_value::<StoredQuestion>(record) {
                Ok(q) => Some(Question::from_wire(
                    id,
                    subject,
                    &q.question,
                    &q.choices,
                    q.correct_answer.as_deref(),
                )),
                Err(e) => {
                    tracing::warn!(id = %id, "skipping malformed question record: {e}");
                    None
                }
            })
            .collect())
    }
}
