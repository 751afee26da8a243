use std::sync::Arc;
use std::time::{Duration, Instant};

mod changes;
mod config;
mod errors;
mod health;
mod logging;
mod pipeline;
mod report;
mod store;
mod summarize;

use crate::changes::{ChangeSetFile, ChangeSource, GitWorkingTree};
use crate::config::AppConfig;
use crate::pipeline::{CancelToken, Pipeline};
use crate::store::TrackingStore;
use crate::summarize::build_chain;

struct App {
    cfg: AppConfig,
    source: Box<dyn ChangeSource>,
    pipeline: Pipeline,
    store: Option<TrackingStore>,
}

impl App {
    fn cancel_token(&self) -> CancelToken {
        let token = CancelToken::new();
        match self.cfg.deadline_secs {
            Some(secs) => token.with_deadline(Instant::now() + Duration::from_secs(secs)),
            None => token,
        }
    }

    /// One inspect → summarize → emit pass.
    fn cycle(&self, cancel: &CancelToken) -> anyhow::Result<()> {
        let span = tracing::info_span!("cycle", run_id = %uuid::Uuid::new_v4());
        let _guard = span.enter();

        let collected = self.source.collect();
        if self.cfg.show_changes {
            if let Ok(changes) = &collected {
                print!("{}", report::render_changes(changes));
            }
        }
        let result = self.pipeline.summarize_collected(collected, cancel)?;
        if self.cfg.json {
            println!("{}", report::render_json(&result)?);
        } else {
            print!("{}", report::render_summary(&result));
        }
        if let Some(store) = &self.store {
            store.commit(&result)?;
        }
        tracing::info!(
            files = result.modified.len(),
            interrupted = result.interrupted,
            "cycle complete"
        );
        Ok(())
    }

    fn settle(&self, joined: Result<anyhow::Result<()>, tokio::task::JoinError>) -> anyhow::Result<()> {
        match joined? {
            Ok(()) => Ok(()),
            Err(e) if self.cfg.once => Err(e),
            Err(e) => {
                tracing::error!(error = %e, "cycle failed");
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cfg = AppConfig::from_env_and_args();
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;

    // Startup health checks (best-effort, logged only)
    let git_ok = cfg.changes_file.is_some() || health::check_git();
    let ollama_ok = cfg.summary_backend == "ollama" && health::check_ollama(&cfg.ollama_host);
    let llama_ok = cfg.summary_backend == "llama_cpp" && health::check_llama_cpp_cli();

    let source: Box<dyn ChangeSource> = match &cfg.changes_file {
        Some(path) => Box::new(ChangeSetFile::new(path.clone())),
        None => Box::new(GitWorkingTree::new(cfg.repo.clone())),
    };
    let store = cfg.tracking_dir.clone().map(TrackingStore::open).transpose()?;
    if let Some(store) = &store {
        tracing::info!(path = %store.root().display(), "recording digests in tracking repository");
    }
    let chain = build_chain(&cfg);

    tracing::info!(
        git_ok = git_ok,
        ollama_ok = ollama_ok,
        llama_cpp_ok = llama_ok,
        source = %source.describe(),
        backends = ?chain.backend_names(),
        interval_secs = cfg.interval_secs,
        "diff-digest startup complete"
    );

    let pipeline = Pipeline::new(Arc::new(chain), cfg.policy());
    let app = Arc::new(App {
        cfg,
        source,
        pipeline,
        store,
    });

    // Blocking HTTP clients live in `app`; keep its last drop outside the runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(watch(app.clone()));
    drop(runtime);
    outcome
}

async fn watch(app: Arc<App>) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(app.cfg.interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal, stopping");
                return Ok(());
            }
        }

        let cancel = app.cancel_token();
        let mut worker = {
            let app = app.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || app.cycle(&cancel))
        };
        tokio::select! {
            joined = &mut worker => app.settle(joined)?,
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal, finishing cycle with partial results...");
                cancel.cancel();
                return app.settle(worker.await);
            }
        }

        if app.cfg.once {
            return Ok(());
        }
    }
}
