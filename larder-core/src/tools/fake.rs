//! Fake providers for tests and offline runs.
//!
//! Outcomes are scripted: queued outcomes are returned first (one per call),
//! then any prompt-matched response, then the default outcome. Both fakes count their calls so tests can
//! assert on retry behaviour.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::types::ChatRequest;
use super::{CompletionProvider, NutritionProvider, ToolFailure};
use crate::types::NutritionFacts;

/// Recipe returned by [`FakeCompletion::with_sample_recipe`].
pub const SAMPLE_RECIPE_JSON: &str = r#"{
    "name": "Tomato Onion Rice",
    "description": "A quick one-pot rice with caramelized onions and tomatoes.",
    "ingredients": [
        "1 cup basmati rice",
        "2 onions, sliced",
        "2 tomatoes, chopped",
        "3 garlic cloves",
        "2 tbsp olive oil",
        "1 tsp salt"
    ],
    "instructions": [
        "Rinse the rice and soak for 15 minutes.",
        "Heat the oil and fry the onions until golden.",
        "Add garlic and tomatoes and cook until soft.",
        "Add rice, salt and 2 cups water; simmer covered for 15 minutes."
    ],
    "prep_time_minutes": 15,
    "cook_time_minutes": 25
}"#;

/// A fake completion provider.
#[derive(Debug)]
pub struct FakeCompletion {
    queued: Mutex<VecDeque<Result<String, ToolFailure>>>,
    /// Responses keyed by a substring of the prompt, first match wins
    responses: RwLock<Vec<(String, String)>>,
    default_outcome: Result<String, ToolFailure>,
    delay: Option<Duration>,
    calls: AtomicU32,
}

impl Default for FakeCompletion {
    fn default() -> Self {
        Self::new(Ok("{}".to_string()))
    }
}

impl FakeCompletion {
    /// A fake that always produces `outcome`.
    pub fn new(default_outcome: Result<String, ToolFailure>) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            responses: RwLock::new(Vec::new()),
            default_outcome,
            delay: None,
            calls: AtomicU32::new(0),
        }
    }

    /// A fake that always answers with `response`.
    pub fn with_response(response: &str) -> Self {
        Self::new(Ok(response.to_string()))
    }

    /// A fake that always fails with `failure`.
    pub fn failing(failure: ToolFailure) -> Self {
        Self::new(Err(failure))
    }

    /// A fake that returns [`SAMPLE_RECIPE_JSON`].
    pub fn with_sample_recipe() -> Self {
        Self::with_response(SAMPLE_RECIPE_JSON)
    }

    /// Queue an outcome for the next unanswered call.
    pub fn then(self, outcome: Result<String, ToolFailure>) -> Self {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    /// Answer with `response` whenever the prompt contains `prompt_contains`.
    ///
    /// Keys are tried in the order they were added.
    pub fn with_prompt_response(self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt_contains.to_string(), response.to_string()));
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ToolFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(outcome) = queued {
            return outcome;
        }

        let prompt = request.prompt_text();
        let responses = self.responses.read().unwrap_or_else(PoisonError::into_inner);
        responses
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map_or_else(|| self.default_outcome.clone(), |(_, response)| Ok(response.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

/// A fake nutrition lookup.
#[derive(Debug)]
pub struct FakeNutrition {
    queued: Mutex<VecDeque<Result<NutritionFacts, ToolFailure>>>,
    default_outcome: Result<NutritionFacts, ToolFailure>,
    delay: Option<Duration>,
    calls: AtomicU32,
    last_query: Mutex<Option<String>>,
}

impl Default for FakeNutrition {
    fn default() -> Self {
        Self::with_facts(Self::sample_facts())
    }
}

impl FakeNutrition {
    pub fn new(default_outcome: Result<NutritionFacts, ToolFailure>) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_outcome,
            delay: None,
            calls: AtomicU32::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn with_facts(facts: NutritionFacts) -> Self {
        Self::new(Ok(facts))
    }

    pub fn failing(failure: ToolFailure) -> Self {
        Self::new(Err(failure))
    }

    /// Whole-recipe totals for [`SAMPLE_RECIPE_JSON`].
    pub fn sample_facts() -> NutritionFacts {
        [
            ("calories", 980.0),
            ("protein_g", 18.4),
            ("fat_total_g", 29.6),
            ("carbohydrates_total_g", 158.2),
            ("fiber_g", 9.8),
            ("sugar_g", 14.0),
            ("sodium_mg", 2350.0),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }

    pub fn then(self, outcome: Result<NutritionFacts, ToolFailure>) -> Self {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// The query text of the most recent call.
    pub fn last_query(&self) -> Option<String> {
        self.last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NutritionProvider for FakeNutrition {
    async fn lookup(&self, query: &str) -> Result<NutritionFacts, ToolFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        queued.unwrap_or_else(|| self.default_outcome.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
