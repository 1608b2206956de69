mod common;

use marg_core::AnyEmptyResult;
use predicates::prelude::*;

#[test]
fn render_with_inline_context() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("greeting.marg", "Hello, {{name}}!")])?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("greeting.marg")
		.arg("-c")
		.arg(r#"{"name": "World"}"#)
		.assert()
		.success()
		.stdout("Hello, World!\n");

	Ok(())
}

#[test]
fn render_with_context_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("list.marg", "{% for item in items %}- {{item}}\n{% endfor %}"),
			("context.yaml", "items:\n  - one\n  - two\n"),
		],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("list.marg")
		.arg("--context-file")
		.arg("context.yaml")
		.assert()
		.success()
		.stdout("- one\n- two\n\n");

	Ok(())
}

#[test]
fn render_uses_sibling_json_context() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("greeting.marg", "Hello, {{name}}!"),
			("greeting.json", r#"{"name": "Sibling"}"#),
		],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg(tmp.path().join("greeting.marg"))
		.assert()
		.success()
		.stdout("Hello, Sibling!\n");

	Ok(())
}

#[test]
fn render_explicit_context_wins_over_sibling() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("greeting.marg", "Hello, {{name}}!"),
			("greeting.json", r#"{"name": "Sibling"}"#),
		],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("greeting.marg")
		.arg("-c")
		.arg(r#"{"name": "Inline"}"#)
		.assert()
		.success()
		.stdout("Hello, Inline!\n");

	Ok(())
}

#[test]
fn render_resolves_includes_next_to_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("prompts/main.marg", "{% include \"parts/header.marg\" %}Body"),
			("prompts/parts/header.marg", "@title: Header\n# Header\n"),
		],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg(tmp.path().join("prompts/main.marg"))
		.assert()
		.success()
		.stdout("# Header\nBody\n");

	Ok(())
}

#[test]
fn render_to_output_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("greeting.marg", "Hello, {{name}}!")])?;
	let output = tmp.path().join("out.md");

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("greeting.marg")
		.arg("-o")
		.arg(&output)
		.arg("-c")
		.arg(r#"{"name": "File"}"#)
		.assert()
		.success()
		.stdout("")
		.stderr(predicate::str::contains("Output written to:"));

	assert_eq!(std::fs::read_to_string(output)?, "Hello, File!");

	Ok(())
}

#[test]
fn render_show_metadata() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("meta.marg", "@task: summarize\n@owner: me\nBody")])?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("meta.marg")
		.arg("--show-metadata")
		.assert()
		.success()
		.stdout("Body\n")
		.stderr(predicate::str::contains(
			"=== Template Metadata ===\nowner: me\ntask: summarize\n=== Rendered Output ===",
		));

	Ok(())
}

#[test]
fn render_directory_to_stdout() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("templates/b.marg", "Second {{name}}"),
			("templates/a.marg", "First {{name}}"),
			("templates/a.json", r#"{"name": "A"}"#),
			("templates/notes.txt", "ignored"),
		],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("templates")
		.assert()
		.success()
		.stdout("First A\n\n--- End of a.marg ---\n\nSecond \n\n--- End of b.marg ---\n\n");

	Ok(())
}

#[test]
fn render_directory_to_output_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[("templates/a.marg", "A {{v}}"), ("templates/b.marg", "B {{v}}")],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("templates")
		.arg("-o")
		.arg("out/nested")
		.arg("-c")
		.arg(r#"{"v": 1}"#)
		.assert()
		.success()
		.stdout("");

	assert_eq!(std::fs::read_to_string(tmp.path().join("out/nested/a.md"))?, "A 1");
	assert_eq!(std::fs::read_to_string(tmp.path().join("out/nested/b.md"))?, "B 1");

	Ok(())
}

#[test]
fn render_directory_uses_configured_extensions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("marg.toml", "extension = \"prompt\"\noutput_extension = \"txt\"\n"),
			("templates/a.prompt", "Prompt"),
			("templates/b.marg", "Skipped"),
		],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("templates")
		.arg("-o")
		.arg("out")
		.assert()
		.success();

	assert_eq!(std::fs::read_to_string(tmp.path().join("out/a.txt"))?, "Prompt");
	assert!(!tmp.path().join("out/b.txt").exists());

	Ok(())
}

#[test]
fn render_empty_directory_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("empty"))?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("empty")
		.assert()
		.code(2)
		.stderr(predicate::str::contains("no `*.marg` templates found"));

	Ok(())
}

#[test]
fn render_missing_template_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("missing.marg")
		.assert()
		.code(2)
		.stderr(predicate::str::contains("neither a file nor a directory"));

	Ok(())
}

#[test]
fn render_missing_include_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("main.marg", "{% include \"gone.marg\" %}")])?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("main.marg")
		.assert()
		.code(2)
		.stderr(predicate::str::contains("template not found"))
		.stderr(predicate::str::contains("gone.marg"));

	Ok(())
}

#[test]
fn render_invalid_inline_context_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("greeting.marg", "Hello")])?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("greeting.marg")
		.arg("-c")
		.arg("{not json")
		.assert()
		.code(2)
		.stderr(predicate::str::contains("failed to parse context"));

	Ok(())
}

#[test]
fn render_inline_context_errors_match_context_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("greeting.marg", "Hello"), ("bad.json", "[1,")])?;

	for args in [["-c", "[1,"], ["-f", "bad.json"]] {
		common::marg_cmd()
			.current_dir(tmp.path())
			.arg("render")
			.arg("greeting.marg")
			.args(args)
			.assert()
			.code(2)
			.stderr(predicate::str::contains("EOF while parsing"));
	}

	Ok(())
}

#[test]
fn render_rejects_both_context_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("greeting.marg", "Hello"), ("c.json", "{}")])?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("greeting.marg")
		.arg("-c")
		.arg("{}")
		.arg("-f")
		.arg("c.json")
		.assert()
		.failure();

	Ok(())
}

#[test]
fn verbose_logs_include_resolution() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[("main.marg", "{% include \"part.marg\" %}"), ("part.marg", "Part")],
	)?;

	common::marg_cmd()
		.current_dir(tmp.path())
		.arg("--verbose")
		.arg("render")
		.arg("main.marg")
		.assert()
		.success()
		.stdout("Part\n")
		.stderr(predicate::str::contains("rendering include"));

	Ok(())
}
