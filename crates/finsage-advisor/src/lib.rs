//! FinSage advisor - per-request orchestration
//!
//! Glues the pure domain pieces (persona prompt, budget split) to the
//! selected remote backend: one outbound call per question, everything
//! recomputed per request, no caching and no shared mutable state.

use finsage_domain::{build_prompt, BudgetSummary, Persona};
use finsage_llm::{AnswerRequest, BackendRouter};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generation cap used for interactive questions.
const ANSWER_MAX_NEW_TOKENS: u32 = 400;
/// Sampling temperature used for interactive questions.
const ANSWER_TEMPERATURE: f32 = 0.2;

/// Header introducing the budget reference appended to the prompt.
const BUDGET_REFERENCE_HEADER: &str = "\n\nReference budget (income info):\n";

/// Reply produced for a blank question; no backend call is made.
const EMPTY_QUESTION_REPLY: &str = "Please enter a question.";

/// One user interaction: a question plus its presentation context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub question: String,
    pub persona: Persona,
    /// Monthly income; `0.0` means "not provided".
    pub monthly_income: f64,
}

impl AdvisorRequest {
    pub fn new(question: impl Into<String>, persona: Persona) -> Self {
        Self {
            question: question.into(),
            persona,
            monthly_income: 0.0,
        }
    }

    pub fn with_monthly_income(mut self, monthly_income: f64) -> Self {
        self.monthly_income = monthly_income;
        self
    }
}

/// What one interaction produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorReply {
    /// Generated answer, or the descriptive error text that replaced it.
    pub answer: String,
    /// Standalone budget summary when an income was provided.
    pub budget: Option<String>,
}

/// Stateless engine: builds the prompt, dispatches, packages the reply.
pub struct AdvisorEngine {
    router: BackendRouter,
}

impl AdvisorEngine {
    pub fn new(router: BackendRouter) -> Self {
        Self { router }
    }

    /// Engine wired from environment variables.
    pub fn from_env() -> Self {
        Self::new(BackendRouter::from_env())
    }

    /// The router this engine dispatches through.
    pub fn router(&self) -> &BackendRouter {
        &self.router
    }

    /// Answer one question.
    ///
    /// An income above zero adds a budget reference to the prompt and a
    /// standalone summary to the reply; both are computed from the same
    /// split and render identically.
    pub async fn ask(&self, request: &AdvisorRequest) -> AdvisorReply {
        if request.question.trim().is_empty() {
            return AdvisorReply {
                answer: EMPTY_QUESTION_REPLY.to_string(),
                budget: None,
            };
        }

        let mut prompt = build_prompt(&request.question, request.persona);
        if request.monthly_income > 0.0 {
            prompt.push_str(BUDGET_REFERENCE_HEADER);
            prompt.push_str(&BudgetSummary::with_default_split(request.monthly_income).render());
        }

        debug!("dispatching question via {}", self.router.kind());
        let answer = self
            .router
            .answer(
                AnswerRequest::new(prompt)
                    .with_max_new_tokens(ANSWER_MAX_NEW_TOKENS)
                    .with_temperature(ANSWER_TEMPERATURE),
            )
            .await;

        let budget = if request.monthly_income > 0.0 {
            Some(BudgetSummary::with_default_split(request.monthly_income).render())
        } else {
            None
        };

        AdvisorReply { answer, budget }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finsage_llm::{BackendKind, ChatBackend};
    use std::sync::{Arc, Mutex};

    /// Records each dispatched request and returns a canned answer.
    struct RecordingBackend {
        requests: Mutex<Vec<AnswerRequest>>,
    }

    impl RecordingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<AnswerRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for RecordingBackend {
        fn name(&self) -> &'static str {
            "Recording"
        }

        fn kind(&self) -> BackendKind {
            BackendKind::Granite
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn answer(&self, request: AnswerRequest) -> String {
            self.requests.lock().unwrap().push(request);
            "canned answer".to_string()
        }
    }

    fn engine_over(backend: Arc<RecordingBackend>) -> AdvisorEngine {
        AdvisorEngine::new(BackendRouter::new(backend))
    }

    #[tokio::test]
    async fn ask_without_income_skips_budget() {
        let backend = RecordingBackend::new();
        let engine = engine_over(backend.clone());

        let request = AdvisorRequest::new("How do I start an emergency fund?", Persona::Student);
        let reply = engine.ask(&request).await;

        assert_eq!(reply.answer, "canned answer");
        assert!(reply.budget.is_none());

        let dispatched = backend.recorded();
        assert_eq!(dispatched.len(), 1);
        assert!(dispatched[0].prompt.contains("How do I start an emergency fund?"));
        assert!(!dispatched[0].prompt.contains("Reference budget"));
        assert_eq!(dispatched[0].max_new_tokens, 400);
        assert_eq!(dispatched[0].temperature, 0.2);
    }

    #[tokio::test]
    async fn ask_with_income_appends_budget_reference() {
        let backend = RecordingBackend::new();
        let engine = engine_over(backend.clone());

        let request = AdvisorRequest::new("How should I budget my salary?", Persona::Professional)
            .with_monthly_income(30_000.0);
        let reply = engine.ask(&request).await;

        let expected_summary = BudgetSummary::with_default_split(30_000.0).render();
        assert_eq!(reply.budget.as_deref(), Some(expected_summary.as_str()));

        let dispatched = backend.recorded();
        assert_eq!(dispatched.len(), 1);
        assert!(dispatched[0].prompt.contains("Reference budget (income info):"));
        assert!(dispatched[0].prompt.contains("₹30,000.00"));
        assert!(dispatched[0].prompt.ends_with(&expected_summary));
    }

    #[tokio::test]
    async fn blank_question_short_circuits() {
        let backend = RecordingBackend::new();
        let engine = engine_over(backend.clone());

        let request = AdvisorRequest::new("   ", Persona::Student).with_monthly_income(30_000.0);
        let reply = engine.ask(&request).await;

        assert_eq!(reply.answer, "Please enter a question.");
        assert!(reply.budget.is_none());
        assert!(backend.recorded().is_empty());
    }

    #[tokio::test]
    async fn persona_clauses_flow_into_prompt() {
        let backend = RecordingBackend::new();
        let engine = engine_over(backend.clone());

        let request = AdvisorRequest::new("Should I prepay my loan?", Persona::Professional);
        engine.ask(&request).await;

        let dispatched = backend.recorded();
        assert!(dispatched[0].prompt.contains(Persona::Professional.tone()));
        assert!(dispatched[0].prompt.contains(Persona::Professional.depth()));
    }
}
