use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render and compose prompt templates.",
	long_about = "marg renders prompt templates written in a small templating language with \
	              variables, conditionals, loops, includes and document metadata.\n\nQuick \
	              start:\n  marg render greeting.marg -c '{\"name\": \"World\"}'\n  marg metadata \
	              prompts/\n  marg compose prompts/ system.marg task.marg"
)]
pub struct MargCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for `marg.toml`. Defaults to the current directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// Where the render context comes from. At most one source may be given.
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
	/// Inline JSON context, e.g. `{"name": "World"}`.
	#[arg(long, short, conflicts_with = "context_file")]
	pub context: Option<String>,

	/// Context file in JSON, TOML or YAML format, chosen by extension.
	#[arg(long, short = 'f')]
	pub context_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a template file, or every template in a directory.
	///
	/// Without an explicit context, a `.json` file next to each template with
	/// the same stem is used when it exists. Includes resolve relative to the
	/// directory of the rendered template.
	Render {
		/// A template file or a directory of templates.
		template_path: PathBuf,

		/// Output file, or output directory when rendering a directory.
		/// Defaults to stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,

		#[command(flatten)]
		context: ContextArgs,

		/// Print template metadata to stderr before the rendered output.
		#[arg(long, default_value_t = false)]
		show_metadata: bool,
	},
	/// Show the metadata of a template file, or of every template in a
	/// directory.
	Metadata {
		/// A template file or a directory of templates.
		template_path: PathBuf,

		/// Output format. Use `text` for `key: value` lines or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Render several templates from a template store and join them.
	///
	/// Template names and includes resolve relative to `ROOT`.
	Compose {
		/// The template store directory.
		root: PathBuf,

		/// Template names relative to the store, rendered in order.
		#[arg(required = true)]
		names: Vec<String>,

		#[command(flatten)]
		context: ContextArgs,

		/// Text placed between rendered templates. Defaults to the
		/// `separator` from `marg.toml`, or a blank line.
		#[arg(long, short)]
		separator: Option<String>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable `key: value` lines.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
