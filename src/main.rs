// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::env;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use the_flowgraph::config::load_and_validate_config;
use the_flowgraph::data::Data;
use the_flowgraph::modules::{InputMessage, Message};
use the_flowgraph::toolboxes::LocalEnvironment;
use the_flowgraph::workflows::ProjectState;

/// Sinks quiet for this long are considered done
const QUIET_PERIOD: Duration = Duration::from_millis(1500);
/// Upper bound on waiting for producers
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

type Collected = Arc<Mutex<Vec<Message>>>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <workflow.yaml|toml> [workflow2.yaml ...] <input_text>", args[0]);
        eprintln!("Example: {} configs/text-pipeline.yaml \"hello world\"", args[0]);
        eprintln!("         {} configs/reactive-pipeline.yaml \"go\"", args[0]);
        std::process::exit(1);
    }

    // The last argument is the input text, everything before it a workflow
    let input_text = &args[args.len() - 1];
    let config_files = &args[1..args.len() - 1];

    println!("🚀 Flowgraph");
    println!("═══════════════════════════════════");
    println!("Input: \"{}\"", input_text);
    println!();

    for (i, config_file) in config_files.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(80));
        }
        if let Err(e) = run_workflow(config_file, input_text).await {
            eprintln!("❌ Failed to run {}: {:#}", config_file, e);
        }
    }
}

async fn run_workflow(config_file: &str, input_text: &str) -> Result<()> {
    let started = Instant::now();
    let config = load_and_validate_config(config_file).with_context(|| format!("loading {}", config_file))?;
    let project = ProjectState::from_config(&config, Arc::new(LocalEnvironment::builtin()), &BTreeMap::new())
        .await
        .context("building the workflow")?;

    println!("📋 Workflow: {}", config_file);
    println!(
        "🔧 {} modules, {} connections",
        project.main().module_count(),
        project.main().connection_count()
    );

    let mut outputs = Vec::new();
    let mut subscriptions = Vec::new();
    for sink in project.main().sink_modules() {
        for slot in sink.output_slots() {
            let seen: Collected = Arc::default();
            let collected = seen.clone();
            subscriptions.push(slot.observable().subscribe(move |m: &Message| {
                collected.lock().unwrap_or_else(|p| p.into_inner()).push(m.clone());
            }));
            outputs.push((format!("{}:{}", sink.uid(), slot.slot_id()), seen));
        }
    }

    let context = Data::record([("config_file", config_file)]);
    for entry in project.main().entry_modules() {
        for slot in entry.input_slots() {
            slot.send(InputMessage::new(input_text).with_context(context.clone()));
        }
    }

    if project.main().modules().any(|m| m.input_slots().is_empty()) {
        println!("⏳ Waiting for producers...");
        settle(&outputs).await;
    }

    println!("\n📊 Results:");
    for (label, seen) in &outputs {
        for message in seen.lock().unwrap_or_else(|p| p.into_inner()).iter() {
            println!("  {} → {}", label, message.data);
        }
    }

    println!("\n📓 Journals:");
    for module in project.main().modules() {
        for slot in module.input_slots() {
            println!(
                "  {}:{} delivered {} dropped {}",
                module.uid(),
                slot.slot_id(),
                slot.delivered(),
                slot.dropped()
            );
        }
        for page in module.journal().pages().iter().filter(|p| p.entry_point.has_errors()) {
            println!("  ⚠️  {} / {}", module.uid(), page.title);
        }
    }

    for subscription in subscriptions {
        subscription.unsubscribe();
    }
    println!("\n⏱️  Total Time: {:?}", started.elapsed());
    Ok(())
}

/// Producers keep emitting after the input was sent; wait until the sinks
/// have been quiet for a while.
async fn settle(outputs: &[(String, Collected)]) {
    let total = || -> usize {
        outputs
            .iter()
            .map(|(_, seen)| seen.lock().unwrap_or_else(|p| p.into_inner()).len())
            .sum()
    };
    let deadline = Instant::now() + SETTLE_LIMIT;
    let mut last = total();
    while Instant::now() < deadline {
        tokio::time::sleep(QUIET_PERIOD).await;
        let current = total();
        if current == last {
            break;
        }
        last = current;
    }
}
