//! CLI argument parsing for stagetime.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stagetime: renders staged Tekton PipelineRun manifests for a revision run.
///
/// A revision run request names a repository revision and a list of
/// pipeline invocations, each assigned to a stage. Every invocation becomes
/// one PipelineRun manifest, and the run as a whole is recorded in a
/// tracking ConfigMap.
#[derive(Parser, Debug)]
#[command(name = "stagetime")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for stagetime.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every invocation of a request.
    ///
    /// Prints manifests by ascending stage, then the tracking document.
    /// Invocations that fail are reported on stderr; the rest are still
    /// emitted and the command exits with status 2.
    Render(RenderArgs),

    /// Render an inline template against key/value pairs.
    ///
    /// Placeholders use `{{ name }}` (curly) or `[[ name ]]` (square).
    Template(TemplateArgs),

    /// List the stages of a request and the invocations in each.
    ///
    /// Decodes every invocation without rendering anything.
    Stages(StagesArgs),
}

/// Output format for the `render` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Multi-document YAML stream.
    #[default]
    Yaml,
    /// One JSON object with buckets, stages, tracking and failures.
    Json,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Request file (YAML or JSON), or `-` for stdin.
    #[arg(short, long)]
    pub request: PathBuf,

    /// Configuration file (defaults are used when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target namespace, overriding config and PIPELINE_WORKSPACE.
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Write one `<name>.yaml` file per document into this directory.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format when printing to stdout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Append NDJSON events to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,
}

/// Arguments for the `template` command.
#[derive(Parser, Debug)]
pub struct TemplateArgs {
    /// Template text.
    #[arg(short, long, conflicts_with = "template_file", required_unless_present = "template_file")]
    pub template: Option<String>,

    /// File holding the template text.
    #[arg(long)]
    pub template_file: Option<PathBuf>,

    /// Delimiter style (curly, square).
    #[arg(short, long, default_value = "curly")]
    pub delimiter: String,

    /// Values as `key=value` pairs separated by commas.
    #[arg(long)]
    pub values: Option<String>,

    /// YAML mapping of values; `--values` entries take precedence.
    #[arg(long)]
    pub values_file: Option<PathBuf>,

    /// Configuration file, consulted for `events_file`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Append NDJSON events to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,
}

/// Arguments for the `stages` command.
#[derive(Parser, Debug)]
pub struct StagesArgs {
    /// Request file (YAML or JSON), or `-` for stdin.
    #[arg(short, long)]
    pub request: PathBuf,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_render_minimal() {
        let cli = Cli::try_parse_from(["stagetime", "render", "--request", "run.yaml"]).unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.request, PathBuf::from("run.yaml"));
            assert_eq!(args.format, OutputFormat::Yaml);
            assert!(args.config.is_none());
            assert!(args.namespace.is_none());
            assert!(args.output_dir.is_none());
        } else {
            panic!("Expected Render command");
        }
    }

    #[test]
    fn parse_render_full() {
        let cli = Cli::try_parse_from([
            "stagetime",
            "render",
            "-r",
            "-",
            "--config",
            "stagetime.yaml",
            "--namespace",
            "tekton-ci",
            "--output-dir",
            "out",
            "--format",
            "json",
            "--events",
            "events.ndjson",
        ])
        .unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.request, PathBuf::from("-"));
            assert_eq!(args.namespace.as_deref(), Some("tekton-ci"));
            assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            assert_eq!(args.format, OutputFormat::Json);
            assert_eq!(args.events, Some(PathBuf::from("events.ndjson")));
        } else {
            panic!("Expected Render command");
        }
    }

    #[test]
    fn parse_render_requires_request() {
        assert!(Cli::try_parse_from(["stagetime", "render"]).is_err());
    }

    #[test]
    fn parse_render_rejects_unknown_format() {
        let result = Cli::try_parse_from(["stagetime", "render", "-r", "x", "--format", "toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_template_inline() {
        let cli = Cli::try_parse_from([
            "stagetime",
            "template",
            "--template",
            "hello [[ name ]]",
            "--delimiter",
            "square",
            "--values",
            "name=world",
        ])
        .unwrap();
        if let Command::Template(args) = cli.command {
            assert_eq!(args.template.as_deref(), Some("hello [[ name ]]"));
            assert_eq!(args.delimiter, "square");
            assert_eq!(args.values.as_deref(), Some("name=world"));
        } else {
            panic!("Expected Template command");
        }
    }

    #[test]
    fn parse_template_defaults_to_curly() {
        let cli =
            Cli::try_parse_from(["stagetime", "template", "--template-file", "t.txt"]).unwrap();
        if let Command::Template(args) = cli.command {
            assert_eq!(args.delimiter, "curly");
            assert!(args.template.is_none());
            assert_eq!(args.template_file, Some(PathBuf::from("t.txt")));
        } else {
            panic!("Expected Template command");
        }
    }

    #[test]
    fn parse_template_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["stagetime", "template"]).is_err());
        assert!(
            Cli::try_parse_from([
                "stagetime",
                "template",
                "--template",
                "x",
                "--template-file",
                "t.txt"
            ])
            .is_err()
        );
    }

    #[test]
    fn parse_stages() {
        let cli = Cli::try_parse_from(["stagetime", "stages", "--request", "run.yaml"]).unwrap();
        assert!(matches!(cli.command, Command::Stages(_)));
    }
}
