//! The `exitscore list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use exitscore_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = exitscore_providers::config::load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if let Some(filter) = &provider_filter {
            if name != filter {
                continue;
            }
        }

        let provider = match create_provider(name, &config.providers[name]) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!(provider = %name, "skipping provider: {e:#}");
                continue;
            }
        };
        let models = provider.available_models();

        if !models.is_empty() {
            found_any = true;
            let marker = if *name == config.default_provider { " (default)" } else { "" };
            println!("Provider: {name}{marker}");
            for model in &models {
                let preferred = if model.id == config.preferred_model { " *" } else { "" };
                println!(
                    "  {}{} — {} ({}K context, ${:.4}/{:.4} per 1K tokens)",
                    model.id,
                    preferred,
                    model.name,
                    model.max_context / 1000,
                    model.cost_per_1k_input,
                    model.cost_per_1k_output,
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `exitscore init` to create a config file.");
    }

    Ok(())
}
