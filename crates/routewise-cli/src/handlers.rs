//! Command handlers.

use anyhow::{Result, bail};
use routewise_core::{ModelPreferences, Priority, RouterConfig, TaskCategory, TaskRequest};
use routewise_routing::{
    InMemoryUsageLogger, ModelCatalog, ProviderRegistry, RouteOrchestrator, RouteResponse,
    TaskClassifier, UsageLogger,
};
use std::path::Path;
use std::sync::Arc;

/// Loads the config from `path`, or from `~/.routewise/config.toml` when absent.
///
/// An unreadable default config falls back to built-in defaults; an explicit
/// path must load cleanly.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    if let Some(path) = path {
        return Ok(RouterConfig::load_from_file(path)?);
    }

    Ok(RouterConfig::load_or_create().unwrap_or_else(|error| {
        tracing::warn!("Failed to load config from ~/.routewise/config.toml: {error}");
        tracing::warn!("Using default configuration");
        RouterConfig::default()
    }))
}

/// Options of the `route` command.
pub struct RouteArgs {
    pub input: String,
    pub priority: Option<Priority>,
    pub preferred: Vec<String>,
    pub avoided: Vec<String>,
    pub json: bool,
}

impl RouteArgs {
    fn into_request(self) -> TaskRequest {
        let model_preferences = if self.preferred.is_empty() && self.avoided.is_empty() {
            None
        } else {
            Some(ModelPreferences {
                preferred_models: self.preferred,
                avoid_models: self.avoided,
            })
        };
        TaskRequest {
            id: None,
            input: self.input,
            priority: self.priority,
            model_preferences,
            context: None,
        }
    }
}

/// Routes one prompt and prints the response.
pub async fn handle_route(config: &RouterConfig, args: RouteArgs) -> Result<()> {
    let json = args.json;
    let usage = Arc::new(InMemoryUsageLogger::default());
    let orchestrator = RouteOrchestrator::from_config(config)?
        .with_usage_logger(Arc::clone(&usage) as Arc<dyn UsageLogger>);

    let outcome = orchestrator.handle(args.into_request()).await;
    orchestrator.shutdown().await;

    let response = match outcome {
        Ok(response) => response,
        Err(body) => bail!("{} (status {})", body.error, body.status),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    tracing::info!(
        "Usage: {} request(s), ${:.6} total",
        usage.len(),
        usage.total_cost()
    );
    Ok(())
}

fn print_response(response: &RouteResponse) {
    println!("{}", response.response);
    println!();
    println!("model:     {}", response.selected_model);
    println!("category:  {}", response.task_type);
    println!("cost:      ${:.6}", response.cost);
    println!("time:      {:.0}ms", response.estimated_time);
    println!(
        "source:    {}",
        if response.is_real_response {
            "backend"
        } else {
            "simulated"
        }
    );
}

/// Prints the catalog the router would select from.
pub fn handle_models(config: &RouterConfig, category: Option<TaskCategory>) -> Result<()> {
    let registry = ProviderRegistry::from_config(config)?;
    let catalog = ModelCatalog::new(config.models.clone(), registry.discovered_models());

    let models = match category {
        Some(category) => catalog.models_for(category),
        None => catalog.all_models().to_vec(),
    };

    println!(
        "{:<28} {:<10} {:>12} {:>4} {:>4}  live",
        "model", "provider", "$/1K tokens", "q", "s"
    );
    for model in models {
        println!(
            "{:<28} {:<10} {:>12.5} {:>4} {:>4}  {}",
            model.id,
            model.provider_name,
            model.cost_per_k_tokens(),
            model.quality_rating,
            model.speed_rating,
            if registry.has_provider(&model.provider_name) {
                "yes"
            } else {
                "no"
            }
        );
    }
    Ok(())
}

/// Prints the category assigned to `input`.
pub fn handle_classify(input: &str) {
    println!("{}", TaskClassifier.classify(input));
}
