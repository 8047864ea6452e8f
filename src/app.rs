use std::io::Write;
use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{CliArgs, ViewCommand};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat, OutputRecord};
use crate::view::{RemoteEndpoints, RenderContext, ViewListSettings};

#[derive(Debug, Clone)]
struct RunConfig {
    endpoints: RemoteEndpoints,
    output: Option<String>,
    format: OutputFormat,
    no_color: bool,
    command: ViewCommand,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let install_url = args
        .install_url
        .or(cfg.install_url)
        .filter(|u| !crate::utils::is_blank(u))
        .ok_or_else(|| {
            "no remote install URL (use --install-url or install_url in the config)".to_string()
        })?;
    let lovd_url = args
        .lovd_url
        .or(cfg.lovd_url)
        .filter(|u| !crate::utils::is_blank(u))
        .unwrap_or_else(|| install_url.clone());

    let output = args.output.or(cfg.output);
    let format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html or json"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    let command = args
        .command
        .ok_or_else(|| "no view requested (try `extview --help`)".to_string())?;

    Ok(RunConfig {
        endpoints: RemoteEndpoints::new(install_url, lovd_url),
        output,
        format,
        no_color,
        command,
    })
}

fn resolve_settings(command: &ViewCommand, cfg: &ConfigFile) -> Result<ViewListSettings, String> {
    let settings = match command {
        ViewCommand::FullData { gene, transcript } => crate::requests::full_data(
            gene.as_deref().unwrap_or_default(),
            transcript.as_deref().unwrap_or_default(),
        )
        .map_err(|e| e.to_string())?,
        ViewCommand::Individuals => crate::requests::individuals(),
        ViewCommand::Phenotypes { disease } => {
            crate::requests::phenotypes(disease.as_deref().unwrap_or_default())
                .map_err(|e| e.to_string())?
        }
        ViewCommand::Custom { name, file, skip } => {
            let mut settings = match (name, file) {
                (_, Some(file)) => config::load_settings_file(&config::expand_tilde(file))
                    .map_err(|e| e.to_string())?,
                (Some(name), None) => cfg.view(name).map_err(|e| e.to_string())?,
                (None, None) => return Err("custom requires a view NAME or --file".to_string()),
            };
            if let Some(raw) = skip.as_deref() {
                settings.cols_to_skip.extend(crate::utils::normalize_csv(raw));
            }
            settings
        }
    };
    Ok(settings)
}

fn render_page(run: &RunConfig, cfg: &ConfigFile) -> Result<Vec<u8>, String> {
    let settings = resolve_settings(&run.command, cfg)?;
    let mut ctx = RenderContext::new(run.endpoints.clone());
    let rendered = ctx.render(&settings).map_err(|e| e.to_string())?;
    info!(viewlistid = %rendered.viewlistid, "view list rendered");

    let records = vec![OutputRecord { settings, rendered }];
    Ok(output::render(run.format, &run.endpoints, &records))
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let path = config::expand_tilde(path);
            std::fs::write(&path, bytes)
                .map_err(|e| format!("failed to write output '{}': {e}", path.display()))?;
            debug!(path = %path.display(), bytes = bytes.len(), "output written");
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write to stdout: {e}"))
        }
    }
}

fn config_path(args: &CliArgs) -> Option<PathBuf> {
    args.config
        .as_deref()
        .map(config::expand_tilde)
        .or_else(config::default_config_path)
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    if args.init_config {
        let path = config_path(&args).ok_or_else(|| "cannot locate home directory".to_string())?;
        config::ensure_default_config_file(&path).map_err(|e| e.to_string())?;
        println!("config: {}", path.display());
        return Ok(());
    }

    let cfg = match (args.config.as_deref(), config_path(&args)) {
        (Some(_), Some(path)) => config::load_config(&path, false).map_err(|e| e.to_string())?,
        (None, Some(path)) => config::load_config(&path, true).map_err(|e| e.to_string())?,
        (_, None) => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg.clone())?;
    if run.no_color {
        colored::control::set_override(false);
    }

    let bytes = render_page(&run, &cfg)?;
    write_output(run.output.as_deref(), &bytes)
}
