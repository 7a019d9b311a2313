//! Output formatting for extraction results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the summaries themselves, for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{ClassInfo, Diagnostic, FileSummary, FunctionInfo, Severity, Visibility};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            other => Err(format!("invalid format {:?}, must be 'pretty' or 'json'", other)),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub totals: Totals,
    pub files: Vec<FileSummary>,
}

/// Aggregate counts over every analyzed file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub files: usize,
    pub functions: usize,
    pub classes: usize,
    pub imports: usize,
    pub syntax_errors: usize,
    pub warnings: usize,
}

impl Totals {
    pub fn from_files(files: &[FileSummary]) -> Self {
        let mut totals = Totals {
            files: files.len(),
            ..Totals::default()
        };
        for file in files {
            let s = &file.summary;
            totals.functions += s.all_functions().count();
            totals.classes += s.classes.len();
            totals.imports += s.imports.len();
            totals.syntax_errors += s.syntax_errors.len();
            totals.warnings += s.warnings.len();
        }
        totals
    }
}

pub fn build_json_report(path: &str, files: &[FileSummary]) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        totals: Totals::from_files(files),
        files: files.to_vec(),
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, files: &[FileSummary]) -> anyhow::Result<()> {
    let report = build_json_report(path, files);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, files: &[FileSummary]) {
    // Header
    println!();
    print!("  ");
    print!("{}", "codeshape".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Parsing: ".dimmed());
    println!("{}", path);
    println!();

    for file in files {
        write_file(file);
        println!();
    }

    write_totals(&Totals::from_files(files));
    println!();
}

fn write_file(file: &FileSummary) {
    let s = &file.summary;
    print!("  {}", file.path.blue().bold());
    print!("  {}", s.language.dimmed());
    if let Some(package) = &s.package {
        print!("  {}", format!("package {}", package).dimmed());
    }
    println!();

    if !s.imports.is_empty() {
        let external = s.imports.iter().filter(|i| i.is_external).count();
        println!(
            "    {} {} ({} external, {} local)",
            "imports".dimmed(),
            s.imports.len(),
            external,
            s.imports.len() - external
        );
    }

    for class in &s.classes {
        write_class(class);
    }
    for function in &s.functions {
        print!("    ");
        write_function(function);
    }

    for diagnostic in &s.syntax_errors {
        write_diagnostic(diagnostic);
    }
    for diagnostic in &s.warnings {
        write_diagnostic(diagnostic);
    }
}

fn write_class(class: &ClassInfo) {
    print!("    {} {}", class.kind.as_str().magenta(), class.name.bold());
    print!("{}", format!(" {}-{}", class.start_line, class.end_line).dimmed());
    if let Some(base) = &class.extends {
        print!(" extends {}", base);
    }
    if !class.implements.is_empty() {
        print!(" implements {}", class.implements.join(", "));
    }
    if class.is_abstract {
        print!(" {}", "abstract".dimmed());
    }
    println!();

    for property in &class.properties {
        println!(
            "      {} {}: {}",
            visibility_marker(property.visibility),
            property.name,
            property.r#type.dimmed()
        );
    }
    for method in &class.methods {
        print!("      ");
        write_function(method);
    }
}

fn visibility_marker(visibility: Visibility) -> ColoredString {
    match visibility {
        Visibility::Public => "+".green(),
        Visibility::Protected => "#".yellow(),
        Visibility::Private => "-".red(),
        Visibility::Package => "~".normal(),
    }
}

fn write_function(function: &FunctionInfo) {
    let params: Vec<String> = function
        .parameters
        .iter()
        .map(|p| {
            if p.r#type.is_empty() {
                p.name.clone()
            } else {
                format!("{}: {}", p.name, p.r#type)
            }
        })
        .collect();

    let marker = if function.is_exported { "+".green() } else { "-".red() };
    print!("{} {}({})", marker, function.qualified_name(), params.join(", "));
    if let Some(ret) = &function.return_type {
        print!(" -> {}", ret);
    }
    print!("{}", format!(" {}-{}", function.start_line, function.end_line).dimmed());
    print!("  ");
    write_colored_complexity(function.complexity);
    println!();
}

fn write_colored_complexity(complexity: u32) {
    let label = format!("cx {}", complexity);
    match complexity {
        c if c <= 5 => print!("{}", label.green()),
        c if c <= 10 => print!("{}", label.yellow()),
        _ => print!("{}", label.red()),
    }
}

fn write_diagnostic(diagnostic: &Diagnostic) {
    match diagnostic.severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
    }
    print!("{}", format!("{}:{} ", diagnostic.line, diagnostic.column).dimmed());
    print!("{}", diagnostic.message);
    if let Some(code) = &diagnostic.code {
        print!(" {}", format!("[{}]", code).dimmed());
    }
    println!();
}

fn write_totals(totals: &Totals) {
    let plural = if totals.files != 1 { "s" } else { "" };
    print!("  {}", format!("{} file{}", totals.files, plural).bold());
    print!("  {} functions  {} classes", totals.functions, totals.classes);
    print!("  ");
    if totals.syntax_errors > 0 {
        print!("{}", format!("{} errors", totals.syntax_errors).red());
    } else {
        print!("{}", "0 errors".green());
    }
    print!("  ");
    if totals.warnings > 0 {
        print!("{}", format!("{} warnings", totals.warnings).yellow());
    } else {
        print!("{}", "0 warnings".dimmed());
    }
    println!();
}
