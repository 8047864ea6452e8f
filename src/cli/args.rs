use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "extview",
    version,
    about = "render remote LOVD view lists into a page",
    long_about = "extview renders the placeholder form and initialization script for a view list served by a remote LOVD installation.\n\nExamples:\n  extview --install-url https://databases.lovd.nl/shared/ individuals\n  extview full-data --gene IVD --transcript 00000123\n  extview phenotypes --disease 42 -o phenotypes.html\n  extview --config ~/.extview/config.yml custom variants_ivd\n\nTip: Use --config to keep the remote URLs out of every invocation."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity on stderr (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored error output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        global = true,
        help_heading = "Output",
        help = "Write markup to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "format",
        visible_alias = "output-format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format: html or json (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.extview/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'I',
        long = "install-url",
        value_name = "URL",
        global = true,
        help_heading = "Remote",
        help = "Remote LOVD install URL serving inc-js.php."
    )]
    pub install_url: Option<String>,

    #[arg(
        long = "lovd-url",
        visible_alias = "base-url",
        value_name = "URL",
        global = true,
        help_heading = "Remote",
        help = "Remote LOVD base URL serving styles.css (defaults to --install-url)."
    )]
    pub lovd_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<ViewCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    /// Full data view of a gene, restricted to one transcript.
    FullData {
        #[arg(long = "gene", value_name = "SYMBOL", help = "Gene symbol.")]
        gene: Option<String>,

        #[arg(
            long = "transcript",
            visible_alias = "transcript-id",
            value_name = "ID",
            help = "Internal transcript id on the remote LOVD."
        )]
        transcript: Option<String>,
    },

    /// All individuals.
    Individuals,

    /// Phenotypes entered for one disease.
    Phenotypes {
        #[arg(
            long = "disease",
            visible_alias = "disease-id",
            value_name = "ID",
            help = "Internal disease id on the remote LOVD."
        )]
        disease: Option<String>,
    },

    /// A view list described in the config file or in a settings file.
    Custom {
        #[arg(value_name = "NAME", help = "Name of a view under `views:` in the config.")]
        name: Option<String>,

        #[arg(
            short = 'f',
            long = "file",
            value_name = "FILE",
            conflicts_with = "name",
            help = "YAML or JSON file holding one view list's settings."
        )]
        file: Option<String>,

        #[arg(
            long = "skip",
            value_name = "COLUMNS",
            help = "Extra columns to hide (comma-separated)."
        )]
        skip: Option<String>,
    },
}
