//! Summary use-case service.
//!
//! # Invariants
//! - Checks run in order: extracted text length, credential, transport.
//! - Input sent to the endpoint never exceeds `max_input_chars` characters.

use super::client::{ChatCompletionClient, ChatMessage, ChatRequest};
use super::extract::{extract_report_text, truncate_chars};
use super::SummaryError;
use crate::store::KeyValueStore;
use log::info;

/// Storage key holding the chat-completion API key.
pub const API_KEY_STORE_KEY: &str = "labnote.api_key";

/// System prompt fixing the four-section output layout.
pub const SUMMARY_TEMPLATE: &str = "You are a research assistant summarizing a bioinformatics \
experiment report. Respond in markdown using exactly these sections, in this order:\n\
## Objective\n## Methods\n## Results\n## Summary / Conclusions\n\
Use short bullet points, keep key numbers and tool names, and do not invent results that \
are not in the report.";

const MAX_SUMMARY_TOKENS: u32 = 1024;
const SUMMARY_TEMPERATURE: f32 = 0.2;

/// Tunables for summary requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySettings {
    pub model: String,
    /// Extracted text is truncated to this many characters.
    pub max_input_chars: usize,
    /// Extracted text shorter than this is rejected.
    pub min_input_chars: usize,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_input_chars: 12_000,
            min_input_chars: 50,
        }
    }
}

/// Summary service over injected transport and storage capabilities.
pub struct SummaryService<C: ChatCompletionClient, S: KeyValueStore> {
    client: C,
    store: S,
    settings: SummarySettings,
}

impl<C: ChatCompletionClient, S: KeyValueStore> SummaryService<C, S> {
    pub fn new(client: C, store: S, settings: SummarySettings) -> Self {
        Self {
            client,
            store,
            settings,
        }
    }

    /// Returns the stored API key; `None` means "not configured".
    pub fn api_key(&self) -> Result<Option<String>, SummaryError> {
        Ok(self
            .store
            .get(API_KEY_STORE_KEY)?
            .filter(|key| !key.trim().is_empty()))
    }

    /// Stores the API key; a blank key clears it.
    pub fn save_api_key(&mut self, api_key: &str) -> Result<(), SummaryError> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            self.clear_api_key()?;
            return Ok(());
        }
        self.store.set(API_KEY_STORE_KEY, trimmed)?;
        info!("event=api_key_save module=summary status=ok");
        Ok(())
    }

    /// Removes the API key, returning whether one was stored.
    pub fn clear_api_key(&mut self) -> Result<bool, SummaryError> {
        let removed = self.store.remove(API_KEY_STORE_KEY)?;
        info!("event=api_key_clear module=summary status=ok removed={removed}");
        Ok(removed)
    }

    /// Builds the request sent for already-extracted report text.
    pub fn build_request(&self, report_text: &str) -> ChatRequest {
        let text = truncate_chars(report_text, self.settings.max_input_chars);
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(SUMMARY_TEMPLATE),
                ChatMessage::user(format!("Experiment report:\n\n{text}")),
            ],
            max_tokens: MAX_SUMMARY_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        }
    }

    /// Summarizes one HTML report into four-section markdown.
    ///
    /// # Errors
    /// - `InsufficientText` when extraction yields too little text.
    /// - `MissingCredential` when no API key is stored.
    /// - `Http`/`Transport`/`InvalidResponse`/`EmptyResponse` from the client.
    pub fn summarize(&self, report_html: &str) -> Result<String, SummaryError> {
        let text = extract_report_text(report_html);
        let found = text.chars().count();
        if found < self.settings.min_input_chars {
            return Err(SummaryError::InsufficientText {
                found,
                required: self.settings.min_input_chars,
            });
        }

        let api_key = self.api_key()?.ok_or(SummaryError::MissingCredential)?;
        info!(
            "event=summary_prepare module=summary status=ok extracted_chars={found} truncated={}",
            found > self.settings.max_input_chars
        );
        let request = self.build_request(&text);
        self.client.complete(&api_key, &request)
    }
}
