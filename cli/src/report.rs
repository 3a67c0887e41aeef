use client::{Classification, ConfigRegistry, PredictionMeta};

pub fn print_classification(classification: &Classification, meta: Option<&PredictionMeta>, synthetic: bool) {
    if synthetic {
        println!("NOTE: backend unreachable, results below are simulated");
    }
    if let Some(meta) = meta {
        println!(
            "Model {} on {} ({:.2}s{})",
            meta.model_version,
            meta.config,
            meta.processing_time,
            meta.device.as_deref().map(|d| format!(", {}", d)).unwrap_or_default()
        );
    }

    println!("{:<18} {:>8} {:>10}  {:<8} {}", "Disease", "Prob", "Threshold", "Call", "Risk");
    for call in &classification.calls {
        println!(
            "{:<18} {:>7.1}% {:>9.1}%  {:<8} {}",
            call.disease.label(),
            call.probability * 100.0,
            call.threshold * 100.0,
            if call.positive { "POSITIVE" } else { "negative" },
            call.risk.label()
        );
    }

    let summary = &classification.summary;
    println!();
    println!("Positive findings: {}", summary.positive_count);
    println!("Mean probability:  {:.1}%", summary.mean_percent);
    println!(
        "Highest:           {} ({:.1}%)",
        summary.top_disease.label(),
        summary.top_probability * 100.0
    );
}

pub fn print_catalog(registry: &ConfigRegistry) {
    for config in registry.configs() {
        println!(
            "{} - {}: {} (image {}px, lr {:e})",
            config.id, config.name, config.description, config.image_size, config.learning_rate
        );
        let models = registry.models_for(&config.id);
        if models.is_empty() {
            println!("    (no models)");
        }
        for model in models {
            println!("    {} ({})", model.id, model.name);
        }
    }
}
