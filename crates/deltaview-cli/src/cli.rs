use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "deltaview",
    about = "deltaview - structural diffs of JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML render configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Html,
    Terminal,
    Plain,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a delta against its two documents
    Render(RenderArgs),
    /// Print a document with object keys sorted recursively
    Canonicalize(CanonicalizeArgs),
    /// Show the variant of each top-level delta entry
    Classify(ClassifyArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    #[arg(long)]
    pub from: PathBuf,
    #[arg(long)]
    pub to: PathBuf,
    /// Delta file; omit when the documents are identical
    #[arg(long)]
    pub delta: Option<PathBuf>,
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CanonicalizeArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(long)]
    pub delta: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render() {
        let cli = Cli::try_parse_from(["deltaview", "render", "--from", "a.json", "--to", "b.json", "--delta", "d.json"]).unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.from, PathBuf::from("a.json"));
            assert_eq!(args.to, PathBuf::from("b.json"));
            assert_eq!(args.delta, Some(PathBuf::from("d.json")));
            assert_eq!(args.format, OutputFormat::Terminal);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_render_without_delta() {
        let cli = Cli::try_parse_from(["deltaview", "render", "--from", "a", "--to", "b", "--format", "html"]).unwrap();
        if let Command::Render(args) = cli.command {
            assert!(args.delta.is_none());
            assert_eq!(args.format, OutputFormat::Html);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn render_requires_both_documents() {
        assert!(Cli::try_parse_from(["deltaview", "render", "--from", "a"]).is_err());
    }

    #[test]
    fn parse_canonicalize() {
        let cli = Cli::try_parse_from(["deltaview", "canonicalize", "doc.json"]).unwrap();
        assert!(matches!(cli.command, Command::Canonicalize(args) if args.path == PathBuf::from("doc.json")));
    }

    #[test]
    fn parse_classify() {
        let cli = Cli::try_parse_from(["deltaview", "classify", "--delta", "d.json"]).unwrap();
        assert!(matches!(cli.command, Command::Classify(_)));
    }

    #[test]
    fn global_flags() {
        let cli = Cli::try_parse_from(["deltaview", "classify", "--delta", "d.json", "-v", "--config", "c.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(Cli::try_parse_from(["deltaview", "render", "--from", "a", "--to", "b", "--format", "pdf"]).is_err());
    }
}
