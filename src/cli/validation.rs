use crate::cli::args::{CliArgs, ViewCommand};

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --format '{raw}', expected html or json"));
        }
    }
    if let Some(url) = args.install_url.as_deref() {
        if crate::utils::is_blank(url) {
            return Err("invalid --install-url, expected a non-empty URL".to_string());
        }
    }
    if let Some(ViewCommand::Custom { name, file, .. }) = &args.command {
        if name.is_none() && file.is_none() {
            return Err("custom requires a view NAME or --file".to_string());
        }
    }
    Ok(())
}
