//! Command-line interface for codeshape.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::analysis::{collect_files, AnalysisContext, ExtractorRegistry, FileSummary};
use crate::config::{self, Config};
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Heuristic structural extraction for Java and C++.
///
/// Reports functions, classes, imports, exports, complexity, dependencies
/// and suggested test names for each source file, without a compiler
/// front end.
#[derive(Parser)]
#[command(name = "codeshape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract structural summaries from a file or directory
    #[command(visible_alias = "summarize")]
    Parse(ParseArgs),
    /// List supported languages and file extensions
    Languages,
}

/// Arguments for the parse command.
#[derive(Parser)]
pub struct ParseArgs {
    /// Path to parse (file or directory)
    pub path: PathBuf,

    /// Language tag, overriding detection by extension (files only)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log every recognized declaration
    #[arg(short, long)]
    pub verbose: bool,

    /// Exit non-zero when any summary carries syntax errors
    #[arg(long)]
    pub fail_on_errors: bool,
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` is honored; without it only warnings from this crate are shown,
/// or debug events with `--verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("codeshape={}", level).parse() {
        filter = filter.add_directive(directive);
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the config named on the command line, or discover one next to the
/// input path, or fall back to defaults.
fn load_config(args: &ParseArgs, root: &Path) -> anyhow::Result<Config> {
    let path = match &args.config {
        Some(p) => Some(p.clone()),
        None => {
            let dir = if root.is_dir() {
                root
            } else {
                root.parent().unwrap_or(Path::new("."))
            };
            config::discover(dir)
        }
    };

    let mut config = match path {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading config");
            Config::parse_file(&path)?
        }
        None => Config::default(),
    };
    if args.verbose {
        config.options.verbose = true;
    }
    Ok(config)
}

/// Run the parse command.
pub fn run_parse(args: &ParseArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let registry = ExtractorRegistry::with_defaults();

    if let Some(language) = &args.language {
        if let Err(e) = registry.get(language) {
            eprintln!("Error: {}", e);
            eprintln!("Run 'codeshape languages' to see supported languages");
            return Ok(EXIT_ERROR);
        }
    }

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let config = match load_config(args, &args.path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Err(e) = config::validate(&config, &registry.languages()) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    let ctx = AnalysisContext::new(&registry, &config);

    let files: Vec<FileSummary> = if metadata.is_dir() {
        let paths = collect_files(&args.path, &registry, &config)?;
        if paths.is_empty() {
            eprintln!("Warning: no files to parse");
            return Ok(EXIT_SUCCESS);
        }
        ctx.analyze_paths(&paths)
    } else {
        match ctx.analyze_file_as(&args.path, args.language.as_deref()) {
            Ok(summary) => summary.into_iter().collect(),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return Ok(EXIT_ERROR);
            }
        }
    };

    let path_str = args.path.to_string_lossy().to_string();
    match format {
        Format::Json => report::write_json(&path_str, &files)?,
        Format::Pretty => report::write_pretty(&path_str, &files),
    }

    Ok(exit_code(&files, args.fail_on_errors))
}

/// Exit code for a finished run.
pub fn exit_code(files: &[FileSummary], fail_on_errors: bool) -> i32 {
    if fail_on_errors && files.iter().any(|f| f.summary.has_errors()) {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// Run the languages command.
pub fn run_languages() -> anyhow::Result<i32> {
    let registry = ExtractorRegistry::with_defaults();

    println!("Supported languages:");
    println!();
    for extractor in registry.extractors() {
        let mut names = vec![extractor.language_id()];
        names.extend(extractor.aliases());
        let exts: Vec<String> = extractor
            .file_extensions()
            .iter()
            .map(|e| format!(".{}", e))
            .collect();
        println!("  {:<24} {}", names.join(", "), exts.join(" "));
    }

    Ok(EXIT_SUCCESS)
}
