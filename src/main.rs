use clap::{ArgGroup, Parser};
use logmerge_core::config::Config;
use logmerge_core::MergeOptions;
use logmerge_term::{App, Theme};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logmerge",
    version,
    about = "Merge log files into one chronologically ordered stream",
    group(ArgGroup::new("input").required(true).multiple(true).args(["files", "input_filenames"]))
)]
struct Cli {
    /// Log files to merge; `*` and `?` are expanded in the file name.
    files: Vec<String>,

    /// Additional input files (same as the positional arguments).
    #[arg(short = 'i', long = "input-filenames", num_args = 1..)]
    input_filenames: Vec<String>,

    /// Header regex: group 1 is the timestamp, group 2 the filter field.
    #[arg(short = 'p', long = "pattern")]
    pattern: Option<String>,

    /// Keep only entries whose group 2 contains this text.
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Keep only entries containing this text on any line.
    #[arg(short = 's', long = "search")]
    search: Option<String>,

    /// Drop entries before this time (inclusive bound).
    #[arg(long)]
    from: Option<String>,

    /// Drop entries after this time (inclusive bound).
    #[arg(long)]
    to: Option<String>,

    /// Read timestamps without an offset as UTC instead of local time.
    #[arg(short = 'u', long = "utc")]
    utc: bool,

    /// Disable highlighting of the header match.
    #[arg(short = 'n', long = "no-color")]
    no_color: bool,

    /// Configuration file to use instead of ~/.config/logmerge/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug diagnostics to stderr.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn inputs(&self) -> Vec<String> {
        self.input_filenames
            .iter()
            .chain(&self.files)
            .cloned()
            .collect()
    }

    fn merge_options(&self, config: &Config) -> MergeOptions {
        MergeOptions {
            header_pattern: self
                .pattern
                .clone()
                .unwrap_or_else(|| config.merge.pattern.clone()),
            filter: self.filter.clone().unwrap_or_default(),
            search: self.search.clone().unwrap_or_default(),
            from: self.from.clone().unwrap_or_default(),
            to: self.to.clone().unwrap_or_default(),
            assume_utc: self.utc || config.merge.assume_utc,
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = Config::load(cli.config.as_deref())?;
    let theme = Theme::named(&config.output.theme)?;
    let color = !cli.no_color && config.output.color && std::io::stdout().is_terminal();

    let app = App::new(&cli.merge_options(&config), theme)?
        .with_color(color)
        .with_progress(config.output.progress);
    app.run(&cli.inputs())?;
    Ok(())
}
