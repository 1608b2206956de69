use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use marg_cli::Commands;
use marg_cli::ContextArgs;
use marg_cli::MargCli;
use marg_cli::OutputFormat;
use marg_core::AnyEmptyResult;
use marg_core::AnyResult;
use marg_core::Composer;
use marg_core::MargConfig;
use marg_core::MargError;
use marg_core::Metadata;
use marg_core::Renderer;
use marg_core::context::load_context_file;
use marg_core::context::parse_context;
use marg_core::context::sibling_context;
use marg_core::parse_file;
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MargCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render {
			template_path,
			output,
			context,
			show_metadata,
		}) => {
			run_render(
				&args,
				template_path,
				output.as_deref(),
				context,
				*show_metadata,
			)
		}
		Some(Commands::Metadata {
			template_path,
			format,
		}) => run_metadata(&args, template_path, *format),
		Some(Commands::Compose {
			root,
			names,
			context,
			separator,
		}) => run_compose(&args, root, names, context, separator.as_deref()),
		None => {
			eprintln!("No subcommand specified. Run `marg --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<MargError>() {
			Ok(marg_err) => {
				let report: miette::Report = (*marg_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(use_color)
				.with_target(verbose),
		)
		.init();
}

fn resolve_root(args: &MargCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &MargCli) -> AnyResult<MargConfig> {
	let root = resolve_root(args);
	Ok(MargConfig::load_or_default(&root)?)
}

/// The context given on the command line, if any.
fn explicit_context(context: &ContextArgs) -> AnyResult<Option<Value>> {
	if let Some(inline) = &context.context {
		return Ok(Some(parse_context(inline, "json")?));
	}

	if let Some(path) = &context.context_file {
		return Ok(Some(load_context_file(path)?));
	}

	Ok(None)
}

/// The explicit context, else the template's sibling `.json` file, else an
/// empty mapping.
fn context_for(explicit: Option<&Value>, template_path: &Path) -> AnyResult<Value> {
	if let Some(value) = explicit {
		return Ok(value.clone());
	}

	Ok(sibling_context(template_path)?.unwrap_or_else(|| Value::Object(serde_json::Map::new())))
}

fn file_name(path: &Path) -> String {
	path.file_name()
		.map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().to_string())
}

fn run_render(
	args: &MargCli,
	template_path: &Path,
	output: Option<&Path>,
	context: &ContextArgs,
	show_metadata: bool,
) -> AnyEmptyResult {
	let config = load_config(args)?;
	let explicit = explicit_context(context)?;

	if template_path.is_file() {
		let context = context_for(explicit.as_ref(), template_path)?;
		return render_file(&config, template_path, output, &context, show_metadata);
	}

	if !template_path.is_dir() {
		return Err(MargError::NotAFileOrDirectory(template_path.display().to_string()).into());
	}

	let templates = config.list_templates(template_path)?;
	if templates.is_empty() {
		return Err(MargError::NoTemplatesFound {
			path: template_path.display().to_string(),
			extension: config.extension.clone(),
		}
		.into());
	}

	if let Some(output_dir) = output {
		std::fs::create_dir_all(output_dir)?;
	}

	for template in &templates {
		if show_metadata {
			eprintln!("\n=== Processing: {} ===", file_name(template));
		}

		let output_file = output.map(|output_dir| {
			let rendered = template.with_extension(&config.output_extension);
			output_dir.join(rendered.file_name().unwrap_or_default())
		});
		let context = context_for(explicit.as_ref(), template)?;
		render_file(&config, template, output_file.as_deref(), &context, show_metadata)?;

		if output_file.is_none() && templates.len() > 1 {
			println!("\n--- End of {} ---\n", file_name(template));
		}
	}

	Ok(())
}

fn render_file(
	config: &MargConfig,
	template_path: &Path,
	output: Option<&Path>,
	context: &Value,
	show_metadata: bool,
) -> AnyEmptyResult {
	let template = parse_file(template_path)?;

	if show_metadata && !template.metadata.is_empty() {
		eprintln!("{}", colored!("=== Template Metadata ===", bold));
		for (key, value) in &template.metadata {
			eprintln!("{key}: {value}");
		}
		eprintln!("{}", colored!("=== Rendered Output ===", bold));
	}

	let base_path = template_path.parent().unwrap_or_else(|| Path::new(""));
	let renderer = Renderer::new()
		.with_base_path(base_path)
		.with_max_include_depth(config.max_include_depth);
	let result = renderer.render(&template.body, context)?;

	match output {
		Some(output) => {
			std::fs::write(output, result)?;
			eprintln!(
				"{} {}",
				colored!("Output written to:", dimmed),
				output.display()
			);
		}
		None => println!("{result}"),
	}

	Ok(())
}

fn run_metadata(args: &MargCli, template_path: &Path, format: OutputFormat) -> AnyEmptyResult {
	let config = load_config(args)?;

	if template_path.is_file() {
		let template = parse_file(template_path)?;

		match format {
			OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&template.metadata)?),
			OutputFormat::Text if template.metadata.is_empty() => {
				eprintln!("No metadata found in template.");
			}
			OutputFormat::Text => print_metadata(&template.metadata),
		}

		return Ok(());
	}

	if !template_path.is_dir() {
		return Err(MargError::NotAFileOrDirectory(template_path.display().to_string()).into());
	}

	let templates = config.list_templates(template_path)?;
	if templates.is_empty() {
		return Err(MargError::NoTemplatesFound {
			path: template_path.display().to_string(),
			extension: config.extension.clone(),
		}
		.into());
	}

	let mut all = BTreeMap::new();
	let mut printed = false;
	for template_path in &templates {
		let name = file_name(template_path);
		let metadata = match parse_file(template_path) {
			Ok(template) => template.metadata,
			Err(e) => {
				eprintln!(
					"{} {}: {e}",
					colored!("Error processing file:", red),
					template_path.display()
				);
				continue;
			}
		};

		if format == OutputFormat::Json {
			all.insert(name, metadata);
			continue;
		}

		if printed {
			println!();
		}
		printed = true;
		println!("{}", colored!(format!("=== {name} ==="), bold));
		if metadata.is_empty() {
			println!("No metadata found");
		} else {
			print_metadata(&metadata);
		}
	}

	if format == OutputFormat::Json {
		println!("{}", serde_json::to_string_pretty(&all)?);
	}

	Ok(())
}

fn print_metadata(metadata: &Metadata) {
	for (key, value) in metadata {
		println!("{key}: {value}");
	}
}

fn run_compose(
	args: &MargCli,
	root: &Path,
	names: &[String],
	context: &ContextArgs,
	separator: Option<&str>,
) -> AnyEmptyResult {
	let config = load_config(args)?;
	let context = explicit_context(context)?.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
	let mut composer = Composer::with_config(root, &config);

	let result = match separator {
		Some(separator) => composer.compose_prompt(names, &context, separator)?,
		None => composer.compose(names, &context)?,
	};
	tracing::debug!(templates = names.len(), cached = composer.cached_count(), "composed prompt");
	println!("{result}");

	Ok(())
}
