//! Indentation-aware code formatting.
//!
//! Formatting only touches leading whitespace and line endings; the code
//! itself is never parsed.

use stencil_content::Template;
use stencil_platform::{IndentContext, IndentUnit};

/// Languages where leading tabs carry meaning and must survive unchanged.
const TAB_SIGNIFICANT: &[&str] = &["makefile", "make", "go"];

pub fn is_tab_significant(language: &str) -> bool {
	TAB_SIGNIFICANT
		.iter()
		.any(|l| l.eq_ignore_ascii_case(language))
}

/// Formats a whole template for the cursor context.
///
/// Leading tabs in a stored template body are indentation markers, one level
/// each, rendered with the editor's indent unit.
pub fn format_template(template: &Template, ctx: &IndentContext) -> String {
	let normalized = normalize(&template.code);
	let expand = !is_tab_significant(&template.language);
	let lines = dedent(&normalized, !expand);
	let lines = lines
		.into_iter()
		.map(|line| if expand { expand_leading_tabs(line, ctx.unit) } else { line.to_string() });
	indent_continuation(lines, &ctx.line_prefix)
}

/// Formats an arbitrary fragment for the cursor context.
///
/// The fragment keeps its own whitespace. When `context` names a language
/// that does not depend on tabs, leading tabs follow the editor's unit.
pub fn format_snippet(code: &str, context: Option<&Template>, ctx: &IndentContext) -> String {
	let normalized = normalize(code);
	let keep_tabs = context.is_some_and(|t| is_tab_significant(&t.language));
	let expand = context.is_some_and(|t| !t.language.is_empty() && !keep_tabs);
	let lines = dedent(&normalized, keep_tabs);
	let lines = lines
		.into_iter()
		.map(|line| if expand { expand_leading_tabs(line, ctx.unit) } else { line.to_string() });
	indent_continuation(lines, &ctx.line_prefix)
}

/// Splits on `\n` after normalizing `\r\n`, dropping trailing blank lines.
fn normalize(code: &str) -> Vec<String> {
	let code = code.replace("\r\n", "\n");
	let mut lines: Vec<String> = code.split('\n').map(str::to_string).collect();
	while lines.last().is_some_and(|l| l.trim().is_empty()) {
		lines.pop();
	}
	lines
}

/// Removes the whitespace prefix shared by every non-blank line. With
/// `keep_tabs`, only a shared run of spaces is removed.
fn dedent(lines: &[String], keep_tabs: bool) -> Vec<&str> {
	let mut common = lines
		.iter()
		.filter(|l| !l.trim().is_empty())
		.map(|l| leading_whitespace(l))
		.reduce(common_prefix)
		.unwrap_or("");
	if keep_tabs {
		common = &common[..common.bytes().take_while(|b| *b == b' ').count()];
	}

	lines
		.iter()
		.map(|l| {
			if l.trim().is_empty() {
				""
			} else {
				&l[common.len()..]
			}
		})
		.collect()
}

fn leading_whitespace(line: &str) -> &str {
	let end = line
		.find(|c: char| c != ' ' && c != '\t')
		.unwrap_or(line.len());
	&line[..end]
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
	let len = a
		.bytes()
		.zip(b.bytes())
		.take_while(|(x, y)| x == y)
		.count();
	&a[..len]
}

fn expand_leading_tabs(line: &str, unit: IndentUnit) -> String {
	if unit == IndentUnit::Tab {
		return line.to_string();
	}
	let tabs = line.bytes().take_while(|b| *b == b'\t').count();
	if tabs == 0 {
		return line.to_string();
	}
	format!("{}{}", unit.repeat(tabs), &line[tabs..])
}

/// Prefixes every line after the first with `prefix`. Blank lines stay empty.
fn indent_continuation(lines: impl Iterator<Item = String>, prefix: &str) -> String {
	let mut out = String::new();
	for (i, line) in lines.enumerate() {
		if i > 0 {
			out.push('\n');
			if !line.is_empty() {
				out.push_str(prefix);
			}
		}
		out.push_str(&line);
	}
	out
}
