use crate::errors::SummarizeError;
use crate::summarize::{SummarizeResult, Summarizer, SummaryParams};
use reqwest::blocking::Client;

/// Diff text beyond this many characters is cut before it goes into a prompt.
pub const PROMPT_CHAR_LIMIT: usize = 3000;
const TRUNCATION_MARKER: &str = "\n... (truncated)";

const SYSTEM_INSTRUCTION: &str = "You summarize uncommitted source code changes. \
Reply with bullet points only, one change per bullet. \
No headers, no timestamps, no preamble, no closing remarks.";

pub struct OllamaSummarizer {
    host: String,
    model: String,
    max_input: usize,
    client: Client,
}

impl OllamaSummarizer {
    pub fn new(host: String, model: String, max_input: usize) -> Self {
        Self {
            host,
            model,
            max_input,
            client: Client::new(),
        }
    }
}

pub(crate) fn truncate_for_prompt(text: &str) -> String {
    match text.char_indices().nth(PROMPT_CHAR_LIMIT) {
        Some((idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..idx]),
        None => text.to_string(),
    }
}

pub(crate) fn build_prompt(text: &str, params: &SummaryParams) -> String {
    format!(
        "Summarize the following changes in at least {} and at most {} characters.\n\nChanges:\n{}",
        params.min_length,
        params.max_length,
        truncate_for_prompt(text)
    )
}

impl Summarizer for OllamaSummarizer {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn max_input_length(&self) -> Option<usize> {
        Some(self.max_input)
    }

    fn summarize(&self, context: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
        if let Some(res) = params.passthrough(context, self.name()) {
            return Ok(res);
        }

        let url = format!("{}/api/generate", self.host.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "system": SYSTEM_INSTRUCTION,
            "prompt": build_prompt(context, params),
            "options": { "temperature": 0.2, "top_p": 0.9 },
            "stream": false,
        });

        // Simple retry with backoff
        let mut last_err: Option<String> = None;
        for attempt in 0..3 {
            match self.client.post(&url).json(&body).send() {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let v: serde_json::Value = resp
                            .json()
                            .map_err(|e| SummarizeError::Malformed(format!("decode response: {e}")))?;
                        let summary = v
                            .get("response")
                            .and_then(|x| x.as_str())
                            .ok_or_else(|| SummarizeError::Malformed("missing `response` string".into()))?
                            .trim()
                            .to_string();
                        if summary.is_empty() {
                            return Err(SummarizeError::Unavailable);
                        }
                        return Ok(SummarizeResult {
                            summary,
                            backend: self.name().into(),
                        });
                    } else {
                        last_err = Some(format!("status {} from {}", resp.status(), self.host));
                    }
                }
                Err(e) => {
                    last_err = Some(format!("connect {}: {}", self.host, e));
                }
            }
            // backoff
            std::thread::sleep(std::time::Duration::from_millis(100 * (attempt + 1)));
        }
        Err(SummarizeError::Http(
            last_err.unwrap_or_else(|| "ollama request failed".into()),
        ))
    }
}
