use crate::errors::SummarizeError;
use crate::summarize::ollama::build_prompt;
use crate::summarize::{SummarizeResult, Summarizer, SummaryParams};
use std::process::{Command, Stdio};

/// Local abstractive model run through the llama.cpp CLI.
pub struct LlamaCppSummarizer {
    model_path: String,
    cli_path: String,
    max_input: usize,
}

impl LlamaCppSummarizer {
    pub fn new(model_path: String, max_input: usize) -> Self {
        // Allow overriding CLI path via env; default to "llama-cli" on PATH
        let cli_path = std::env::var("LLAMA_CPP_CLI").unwrap_or_else(|_| "llama-cli".to_string());
        Self {
            model_path,
            cli_path,
            max_input,
        }
    }
}

impl Summarizer for LlamaCppSummarizer {
    fn name(&self) -> &'static str {
        "llama_cpp"
    }

    fn max_input_length(&self) -> Option<usize> {
        Some(self.max_input)
    }

    fn summarize(&self, context: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
        if let Some(res) = params.passthrough(context, self.name()) {
            return Ok(res);
        }
        let prompt = format!(
            "[System]\nYou summarize source code changes as terse bullet points. No headers, no preamble.\n\n[User]\n{}",
            build_prompt(context, params)
        );
        // ~4 characters per token
        let max_tokens = params.max_length.div_ceil(4).max(1);

        // Invoke llama.cpp CLI: llama-cli -m <model.gguf> -p <prompt> -n <max_tokens>
        let output = Command::new(&self.cli_path)
            .arg("-m")
            .arg(&self.model_path)
            .arg("-p")
            .arg(&prompt)
            .arg("-n")
            .arg(max_tokens.to_string())
            .stdin(Stdio::null())
            .output()
            .map_err(|_| SummarizeError::Unavailable)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SummarizeError::Other(format!(
                "llama-cli exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let out = String::from_utf8_lossy(&output.stdout);
        let out = out.trim();
        if out.is_empty() {
            return Err(SummarizeError::Unavailable);
        }
        Ok(SummarizeResult {
            summary: out.to_string(),
            backend: self.name().into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn make_cli_script(output: &str) -> PathBuf {
        write_script(&format!("echo {}\n", shell_escape::escape(output.into())))
    }

    fn write_script(body: &str) -> PathBuf {
        let dir = tempfile::tempdir().expect("tmp");
        let path = dir.path().join("llama-cli-mock.sh");
        let _ = Box::leak(Box::new(dir));
        let mut f = File::create(&path).unwrap();
        // Ignore args and run the body
        let script = format!("#!/bin/sh\n{body}");
        f.write_all(script.as_bytes()).unwrap();
        let mut perm = f.metadata().unwrap().permissions();
        perm.set_mode(0o755);
        std::fs::set_permissions(&path, perm).unwrap();
        path
    }

    fn params() -> SummaryParams {
        SummaryParams {
            min_length: 10,
            max_length: 300,
            min_input_length: 0,
            ratio: 0.2,
        }
    }

    #[test]
    fn returns_trimmed_cli_output() {
        let script = make_cli_script("- ok-llama-output");
        std::env::set_var("LLAMA_CPP_CLI", &script);
        let s = LlamaCppSummarizer::new("model.gguf".into(), 2048);
        let res = s.summarize("ctx", &params()).expect("ok");
        assert_eq!(res.backend, "llama_cpp");
        assert_eq!(res.summary, "- ok-llama-output");
    }

    #[test]
    fn failed_model_load_is_an_error_even_with_stdout() {
        let mut s = LlamaCppSummarizer::new("model.gguf".into(), 2048);
        s.cli_path = write_script(
            "echo 'llama_model_load: error loading model'\necho 'failed to open model.gguf' >&2\nexit 1\n",
        )
        .to_string_lossy()
        .into_owned();
        let err = s.summarize("ctx", &params()).unwrap_err();
        match err {
            SummarizeError::Other(msg) => assert!(msg.contains("failed to open model.gguf"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_cli_is_unavailable() {
        let mut s = LlamaCppSummarizer::new("model.gguf".into(), 2048);
        s.cli_path = "/nonexistent/llama-cli".into();
        let err = s.summarize("ctx", &params()).unwrap_err();
        assert!(matches!(err, SummarizeError::Unavailable));
    }
}
