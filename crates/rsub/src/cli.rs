//! Command-line arguments and the pipeline run.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use rsub_config::{CliSettings, Config, OnLoadError};
use rsub_pipeline::{
    Document, HttpLoader, LoadFailurePolicy, PipelineError, ReplaceConverter, printer_for,
};
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

/// Long flags that may also be written with a single dash (`-url=...`).
const LONG_FLAGS: &[&str] = &[
    "url",
    "convert-search-word",
    "convert-replace-word",
    "out-file",
    "config",
    "abort-on-load-error",
    "verbose",
    "help",
    "version",
];

/// Fetch remote text documents, replace a literal in each and print them.
#[derive(Parser, Debug)]
#[command(name = "rsub", version, about)]
pub(crate) struct Cli {
    /// URL to fetch; repeat for several documents, fetched in order.
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Literal to search for in every document (default: empty).
    #[arg(long, value_name = "WORD", allow_hyphen_values = true)]
    convert_search_word: Option<String>,

    /// Replacement for every occurrence of the search word (default: empty).
    #[arg(long, value_name = "WORD", allow_hyphen_values = true)]
    convert_replace_word: Option<String>,

    /// Write the concatenated documents to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    out_file: Option<String>,

    /// Path to a configuration file (rsub.toml); none is read unless given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip conversion and output when any URL fails to load.
    #[arg(long)]
    abort_on_load_error: bool,

    /// Enable verbose output (log each request and stage).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse arguments, accepting single-dash long flags.
    pub(crate) fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            urls: self.urls.clone(),
            search: self.convert_search_word.clone(),
            replace: self.convert_replace_word.clone(),
            out_file: self
                .out_file
                .as_deref()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            on_load_error: self.abort_on_load_error.then_some(OnLoadError::Abort),
        }
    }

    /// Load configuration and run load, convert and print.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is configured, or with the last stage
    /// failure of the run.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            info!("Using configuration from {}", path.display());
        }
        let urls = config.require_sources()?.to_vec();

        let mut loader = HttpLoader::new(urls);
        if let Some(user_agent) = &config.source.user_agent {
            loader = loader.with_user_agent(user_agent);
        }
        let converter =
            ReplaceConverter::new(config.convert.search.clone(), config.convert.replace.clone());
        let policy = match config.pipeline.on_load_error {
            OnLoadError::Continue => LoadFailurePolicy::Continue,
            OnLoadError::Abort => LoadFailurePolicy::Abort,
        };

        let mut document = Document::new(loader, converter, printer_for(config.out_file.as_deref()))
            .with_load_failure_policy(policy);
        let result = document.run();

        if let Err(PipelineError::Load(_)) = &result
            && policy == LoadFailurePolicy::Continue
        {
            output.warning(&format!(
                "Output contains only the {} document(s) loaded before the failure",
                document.documents().len()
            ));
        }

        result.map_err(CliError::from)
    }
}

/// Rewrite `-name` / `-name=value` into `--name` form for known long flags.
///
/// The first argument is the program name. Everything after `--` is left
/// untouched.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || passthrough {
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }
        let rewritten = arg
            .to_str()
            .and_then(single_dash_long_flag)
            .map(|flag| OsString::from(format!("-{flag}")));
        normalized.push(rewritten.unwrap_or(arg));
    }
    normalized
}

/// Return `arg` if it is `-name` or `-name=...` for a known long flag.
fn single_dash_long_flag(arg: &str) -> Option<&str> {
    let flag = arg.strip_prefix('-')?;
    if flag.starts_with('-') {
        return None;
    }
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LONG_FLAGS.contains(&name).then_some(arg)
}
