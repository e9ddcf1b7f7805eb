use std::sync::Arc;

use onboarding_coach::api::{AppState, coach_routes};
use onboarding_coach::checklist::ChecklistRegistry;
use onboarding_coach::config::CoachConfig;
use onboarding_coach::history::InMemoryHistory;
use onboarding_coach::llm::{LlmConfig, create_provider};
use onboarding_coach::logging;
use onboarding_coach::progress::ProgressEvaluator;
use onboarding_coach::relay::{LlmCoach, LlmScreenAnalyzer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CoachConfig::from_env()?;
    let _log_guard = logging::init_tracing(config.log_dir.as_deref(), "onboarding-coach");

    eprintln!("🧭 Onboarding Coach v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Vision model: {}", config.vision_model);
    eprintln!("   Chat model: {}", config.chat_model);

    // ── Checklists ───────────────────────────────────────────────────────
    let mut registry = ChecklistRegistry::builtin();
    if let Some(path) = &config.checklists_path {
        registry = registry.load_file(path)?;
        eprintln!("   Checklists file: {}", path.display());
    }
    eprintln!("   Task types: {}", registry.task_types().collect::<Vec<_>>().join(", "));

    // ── Models ───────────────────────────────────────────────────────────
    let llm_config = |model: &str| LlmConfig {
        api_key: config.api_key.clone(),
        model: model.to_string(),
        base_url: config.llm_base_url.clone(),
        timeout: config.llm_timeout,
    };
    let vision_llm = create_provider(&llm_config(&config.vision_model))?;
    let chat_llm = create_provider(&llm_config(&config.chat_model))?;
    if !vision_llm.is_configured() {
        eprintln!("   Warning: GEMINI_API_KEY not set, analysis and coaching will fail");
    }

    let state = AppState {
        registry: Arc::new(registry),
        evaluator: ProgressEvaluator::new(config.field_matching.matcher()),
        history: Arc::new(InMemoryHistory::new(config.history_capacity)),
        analyzer: Arc::new(LlmScreenAnalyzer::new(
            Arc::clone(&vision_llm),
            config.llm_timeout,
        )),
        coach: Arc::new(LlmCoach::new(chat_llm, config.llm_timeout)),
        llm_configured: vision_llm.is_configured(),
    };

    // ── Server ───────────────────────────────────────────────────────────
    let app = coach_routes(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    eprintln!("   API: http://0.0.0.0:{}/api\n", config.port);
    tracing::info!(port = config.port, "Coach server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
