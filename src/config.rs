use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::SummaryPolicy;
use crate::summarize::SummaryParams;

pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    "py", "rs", "js", "ts", "jsx", "tsx", "java", "c", "h", "cc", "cpp", "hpp", "cs", "go", "rb",
    "php", "swift", "kt", "scala", "sh", "sql", "html", "css",
];

#[derive(Debug, Clone, Parser)]
#[command(name = "diff-digest")]
#[command(about = "Summarizes the uncommitted changes of a git working tree on an interval", long_about = None)]
pub struct AppConfig {
    /// Working tree to inspect
    #[arg(long, env = "DIGEST_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Read the change set from a JSON file instead of git
    #[arg(long, env = "DIGEST_CHANGES_FILE")]
    pub changes_file: Option<PathBuf>,

    #[arg(long, env = "SUMMARY_BACKEND", default_value = "extractive")]
    pub summary_backend: String,

    #[arg(long, env = "SUMMARY_MODEL", default_value = "llama3.2:3b-instruct")]
    pub summary_model: String,

    #[arg(long, env = "OLLAMA_HOST", default_value = "http://127.0.0.1:11434")]
    pub ollama_host: String,

    /// Largest input, in characters, handed to a model backend before chunking
    #[arg(long, env = "MAX_TOKEN_LENGTH", default_value_t = 4000)]
    pub max_token_length: usize,

    #[arg(long, default_value_t = 0.4)]
    pub code_ratio: f64,

    #[arg(long, default_value_t = 40)]
    pub code_min_length: usize,

    #[arg(long, default_value_t = 600)]
    pub code_max_length: usize,

    #[arg(long, default_value_t = 400)]
    pub code_min_input_length: usize,

    #[arg(long, default_value_t = 0.2)]
    pub prose_ratio: f64,

    #[arg(long, default_value_t = 20)]
    pub prose_min_length: usize,

    #[arg(long, default_value_t = 300)]
    pub prose_max_length: usize,

    #[arg(long, default_value_t = 200)]
    pub prose_min_input_length: usize,

    /// Extensions treated as source code (comma separated, without the dot)
    #[arg(
        long,
        env = "DIGEST_CODE_EXTENSIONS",
        value_delimiter = ',',
        default_values_t = DEFAULT_CODE_EXTENSIONS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    )]
    pub code_extensions: Vec<String>,

    #[arg(long, env = "DIGEST_INTERVAL_SECS", default_value_t = 300)]
    pub interval_secs: u64,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Upper bound on a single cycle; files left when it expires are kept verbatim
    #[arg(long, env = "DIGEST_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    /// Separate git repository that receives one commit per digest
    #[arg(long, env = "DIGEST_TRACKING_DIR")]
    pub tracking_dir: Option<PathBuf>,

    /// Print the digest as JSON
    #[arg(long)]
    pub json: bool,

    /// Also print the raw change listing before the digest
    #[arg(long)]
    pub show_changes: bool,
}

impl AppConfig {
    pub fn from_env_and_args() -> Self {
        Self::parse()
    }

    pub fn code_params(&self) -> SummaryParams {
        SummaryParams {
            min_length: self.code_min_length,
            max_length: self.code_max_length,
            min_input_length: self.code_min_input_length,
            ratio: self.code_ratio,
        }
    }

    pub fn prose_params(&self) -> SummaryParams {
        SummaryParams {
            min_length: self.prose_min_length,
            max_length: self.prose_max_length,
            min_input_length: self.prose_min_input_length,
            ratio: self.prose_ratio,
        }
    }

    pub fn policy(&self) -> SummaryPolicy {
        SummaryPolicy::new(
            self.code_params(),
            self.prose_params(),
            self.code_extensions.iter().map(String::as_str),
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        for (label, params) in [("code", self.code_params()), ("prose", self.prose_params())] {
            if !(params.ratio > 0.0 && params.ratio <= 1.0) {
                return Err(format!("{label} ratio must be in (0, 1]"));
            }
            if params.max_length == 0 {
                return Err(format!("{label} max_length must be > 0"));
            }
            if params.min_length > params.max_length {
                return Err(format!("{label} min_length must not exceed max_length"));
            }
        }
        if self.max_token_length == 0 {
            return Err("max_token_length must be > 0".into());
        }
        if self.interval_secs == 0 {
            return Err("interval_secs must be > 0".into());
        }
        if self.summary_backend == "ollama" {
            url::Url::parse(&self.ollama_host)
                .map_err(|_| "Invalid OLLAMA_HOST URL format".to_string())?;
        }
        if self.summary_backend == "llama_cpp" && !std::path::Path::new(&self.summary_model).exists()
        {
            return Err("llama.cpp model file does not exist".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let mut argv = vec!["diff-digest"];
        argv.extend_from_slice(args);
        AppConfig::try_parse_from(argv).expect("parse")
    }

    #[test]
    fn defaults_validate() {
        let cfg = parse(&[]);
        assert_eq!(cfg.summary_backend, "extractive");
        assert_eq!(cfg.code_params().max_length, 600);
        assert_eq!(cfg.prose_params().ratio, 0.2);
        assert!(cfg.code_extensions.iter().any(|e| e == "py"));
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn output_flags_default_off() {
        let cfg = parse(&[]);
        assert!(!cfg.json && !cfg.show_changes && !cfg.once);
        let cfg = parse(&["--show-changes", "--json"]);
        assert!(cfg.show_changes && cfg.json);
    }

    #[test]
    fn code_extensions_split_on_commas() {
        let cfg = parse(&["--code-extensions", "zig,nim"]);
        assert_eq!(cfg.code_extensions, vec!["zig".to_string(), "nim".to_string()]);
    }

    #[test]
    fn rejects_out_of_range_ratio_and_inverted_bounds() {
        let cfg = parse(&["--prose-ratio", "0"]);
        assert!(cfg.validate().unwrap_err().contains("prose ratio"));

        let cfg = parse(&["--code-min-length", "700"]);
        assert!(cfg.validate().unwrap_err().contains("code min_length"));
    }

    #[test]
    fn rejects_bad_ollama_url() {
        let cfg = parse(&["--summary-backend", "ollama", "--ollama-host", "not a url"]);
        assert!(cfg.validate().is_err());
    }
}
