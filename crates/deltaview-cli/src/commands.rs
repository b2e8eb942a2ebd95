use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use deltaview_render::{
    no_changes_markup, parse_document, render_delta, sort_keys, DiffOutcome, DiffRendering,
    HtmlEmitter, LineEmitter, PlainEmitter, RenderConfig, Side, TerminalEmitter,
};
use deltaview_types::{classify, DeltaKind, JsonValue};
use tracing::{debug, warn};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = match cli.command {
        Command::Render(args) => cmd_render(&args, &config)?,
        Command::Canonicalize(args) => cmd_canonicalize(&args)?,
        Command::Classify(args) => cmd_classify(&args)?,
    };
    println!("{output}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RenderConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading render configuration");
            RenderConfig::load(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(RenderConfig::default()),
    }
}

fn read_document(path: &Path, side: Side) -> anyhow::Result<JsonValue> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {side} document {}", path.display()))?;
    Ok(parse_document(&text, side)?)
}

fn emitter(format: OutputFormat, config: &RenderConfig) -> Box<dyn LineEmitter> {
    match format {
        OutputFormat::Html => Box::new(HtmlEmitter::from_config(config)),
        OutputFormat::Terminal => Box::new(TerminalEmitter::from_config(config)),
        OutputFormat::Plain => Box::new(PlainEmitter::from_config(config)),
    }
}

fn cmd_render(args: &RenderArgs, config: &RenderConfig) -> anyhow::Result<String> {
    let from = sort_keys(&read_document(&args.from, Side::From)?);
    let to = sort_keys(&read_document(&args.to, Side::To)?);
    let delta = args
        .delta
        .as_deref()
        .map(|path| read_document(path, Side::Delta))
        .transpose()?;

    match render_delta(&from, &to, delta.as_ref(), config)? {
        DiffOutcome::NoChanges => Ok(match args.format {
            OutputFormat::Html => no_changes_markup().to_string(),
            OutputFormat::Terminal => format!("{}", "No changes.".dimmed()),
            OutputFormat::Plain => "No changes.".to_string(),
        }),
        DiffOutcome::Changes(rendering) => {
            if rendering.truncated {
                warn!(max_depth = config.max_depth, "nesting limit reached; parts of the diff are elided");
            }
            let mut out = rendering.to_markup(emitter(args.format, config).as_ref());
            if args.format == OutputFormat::Terminal {
                out.push('\n');
                out.push_str(&summary(&rendering));
            }
            Ok(out)
        }
    }
}

fn summary(rendering: &DiffRendering) -> String {
    format!(
        "{} {}",
        format!("+{}", rendering.additions()).green().bold(),
        format!("-{}", rendering.removals()).red().bold(),
    )
}

fn cmd_canonicalize(args: &CanonicalizeArgs) -> anyhow::Result<String> {
    let value = sort_keys(&read_document(&args.path, Side::From)?);
    serde_json::to_string_pretty(&value).context("serializing canonical document")
}

fn cmd_classify(args: &ClassifyArgs) -> anyhow::Result<String> {
    let raw = read_document(&args.delta, Side::Delta)?;
    let mut lines = Vec::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    match raw.as_object().filter(|_| classify(&raw) == DeltaKind::Object) {
        Some(entries) => {
            for (key, node) in entries {
                let kind = classify(node);
                lines.push(format!("  {}: {}", key.bold(), kind));
                *counts.entry(kind.to_string()).or_default() += 1;
            }
        }
        None => {
            let kind = classify(&raw);
            lines.push(format!("  (top level): {kind}"));
            *counts.entry(kind.to_string()).or_default() += 1;
        }
    }

    let totals: Vec<String> = counts.iter().map(|(kind, n)| format!("{kind}={n}")).collect();
    lines.push(format!("{} {}", "Summary:".bold(), totals.join(", ")));
    Ok(lines.join("\n"))
}
