//! Client for the quiz backend's HTTP API.
//!
//! Endpoints: `GET /subjects`, `POST /get-quiz`, `POST /submit-quiz` and
//! `POST /analyze-gradesheet` (multipart upload).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use eduflex_core::error::CoreResult;
use eduflex_core::model::Question;
use eduflex_core::traits::{
    GradesheetAnalysis, GradesheetAnalyzer, QuestionBank, QuizOutcome, QuizSubmitter,
    SubmitRequest,
};

use crate::error::{check_status, ProviderError};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The quiz backend, used as question bank, grader and gradesheet analyzer.
pub struct HttpBackend {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        request
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.timeout_secs))
    }
}

#[derive(Serialize)]
struct QuizRequest<'a> {
    subject: &'a str,
}

#[derive(Deserialize)]
struct QuizResponse {
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Deserialize)]
struct WireQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, ProviderError> {
    response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse {what}: {e}")))
}

#[async_trait]
impl QuestionBank for HttpBackend {
    fn name(&self) -> &str {
        "backend"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn subjects(&self) -> CoreResult<Vec<String>> {
        let response = self.send(self.client.get(self.url("subjects"))).await?;
        let response = check_status(response).await?;
        Ok(decode(response, "subject list").await?)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn quiz(&self, subject: &str) -> CoreResult<Vec<Question>> {
        let response = self
            .send(
                self.client
                    .post(self.url("get-quiz"))
                    .json(&QuizRequest { subject }),
            )
            .await?;

        // The backend answers 400 for subjects it has no quiz for.
        if response.status().as_u16() == 400 {
            tracing::warn!(subject, "backend has no quiz for subject");
            return Ok(Vec::new());
        }

        let response = check_status(response).await?;
        let body: QuizResponse = decode(response, "quiz").await?;
        Ok(body
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question::from_wire(i.to_string(), subject, &q.question, &q.options, None))
            .collect())
    }
}

#[async_trait]
impl QuizSubmitter for HttpBackend {
    fn name(&self) -> &str {
        "backend"
    }

    #[instrument(skip(self, request), fields(subject = %request.subject))]
    async fn submit(&self, request: &SubmitRequest) -> CoreResult<QuizOutcome> {
        request.validate()?;
        let response = self
            .send(self.client.post(self.url("submit-quiz")).json(request))
            .await?;
        let response = check_status(response).await?;
        let outcome: QuizOutcome = decode(response, "quiz result").await?;
        tracing::info!(score = outcome.score, difficulty = %outcome.difficulty, "quiz graded remotely");
        Ok(outcome)
    }
}

#[async_trait]
impl GradesheetAnalyzer for HttpBackend {
    fn name(&self) -> &str {
        "backend"
    }

    #[instrument(skip(self, contents), fields(size = contents.len()))]
    async fn analyze(&self, file_name: &str, contents: &[u8]) -> CoreResult<GradesheetAnalysis> {
        let part = reqwest::multipart::Part::bytes(contents.to_vec()).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(self.client.post(self.url("analyze-gradesheet")).multipart(form))
            .await?;
        let response = check_status(response).await?;
        Ok(decode(response, "gradesheet analysis").await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduflex_core::error::CoreError;
    use eduflex_core::model::{AnswerLedger, DifficultyTier};
    use wiremock::matchers::{body_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(&server.uri(), 5).unwrap()
    }

    #[tokio::test]
    async fn lists_subjects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["data science", "business"])),
            )
            .mount(&server)
            .await;

        let subjects = backend(&server).await.subjects().await.unwrap();
        assert_eq!(subjects, vec!["data science", "business"]);
    }

    #[tokio::test]
    async fn fetches_quiz_and_parses_option_labels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-quiz"))
            .and(body_json(serde_json::json!({"subject": "business"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [
                    {"question": "What is ROI?", "options": ["A) Return on Investment", "B) Risk of Inflation"]}
                ]
            })))
            .mount(&server)
            .await;

        let questions = backend(&server).await.quiz("business").await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "What is ROI?");
        assert_eq!(questions[0].options[1].label, "B");
        assert_eq!(questions[0].options[1].text, "Risk of Inflation");
        assert!(questions[0].correct_label.is_none());
    }

    #[tokio::test]
    async fn unknown_subject_is_an_empty_quiz() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-quiz"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "No quiz available for this subject"})),
            )
            .mount(&server)
            .await;

        assert!(backend(&server).await.quiz("astrology").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submits_answers_with_string_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit-quiz"))
            .and(body_json(serde_json::json!({
                "name": "Asha", "age": 17, "subject": "business", "answers": {"0": "A", "2": "C"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "score": 66.66666666666667,
                "difficulty": "intermediate",
                "recommended_courses": [{
                    "course_name": "Finance Basics",
                    "course_link": "https://x/finance",
                    "category": "business",
                    "course_rating": 4.6
                }]
            })))
            .mount(&server)
            .await;

        let request = SubmitRequest {
            name: "Asha".into(),
            age: 17,
            subject: "business".into(),
            answers: [(0, "A"), (2, "C")].into_iter().collect(),
        };
        let outcome = backend(&server).await.submit(&request).await.unwrap();
        assert_eq!(outcome.difficulty, DifficultyTier::Intermediate);
        assert_eq!(outcome.recommended_courses[0].name, "Finance Basics");
    }

    #[tokio::test]
    async fn submit_validates_before_sending() {
        let server = MockServer::start().await;
        let request = SubmitRequest {
            name: "Asha".into(),
            age: 17,
            subject: "business".into(),
            answers: AnswerLedger::new(),
        };
        let err = backend(&server).await.submit(&request).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_external() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = backend(&server).await.subjects().await.unwrap_err();
        assert!(err.is_external());
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_is_external() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subjects"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = backend(&server).await.subjects().await.unwrap_err();
        assert!(err.is_external());
    }

    #[tokio::test]
    async fn uploads_gradesheet_as_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze-gradesheet"))
            .and(body_string_contains("Physics,40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weakest_subjects": {"Physics": 40},
                "recommendations_based_on_weakness": [
                    {"course_name": "Physics Foundations", "course_link": "https://x/p", "category": "other", "course_rating": 4.3}
                ]
            })))
            .mount(&server)
            .await;

        let analysis = backend(&server)
            .await
            .analyze("grades.csv", b"Math,90\nPhysics,40\n")
            .await
            .unwrap();
        assert_eq!(analysis.weakest_subjects.get("Physics"), Some(40.0));
        assert_eq!(analysis.recommendations_based_on_weakness[0].subject, "");
        assert_eq!(
            analysis.recommendations_based_on_weakness[0].course.name,
            "Physics Foundations"
        );
    }
}
