
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use clap::Parser;
use gridplot::config::EditorConfig;
use gridplot::engine::EngineCore;
use gridplot::error::ErrorCode;
use gridplot::script::{execute, parse_line};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("{0} command(s) failed")]
    Failed(usize),
}

/// Flags override `GRIDPLOT_WIDTH`, `GRIDPLOT_HEIGHT` and
/// `GRIDPLOT_EXPORT_TEMPLATE`, which are read leniently by `EditorConfig`.
#[derive(Parser, Debug)]
#[command(name = "gridplot", about = "Drive the grid point editor from a command script")]
struct Cli {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<i64>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<i64>,

    /// Default export template; `{i}`, `{x}` and `{y}` are substituted.
    #[arg(long)]
    template: Option<String>,

    /// Script file, or `-` for stdin.
    #[arg(long, short, default_value = "-")]
    input: String,

    /// Stop at the first failing command.
    #[arg(long)]
    strict: bool,
}

impl Cli {
    /// Environment defaults with this invocation's flags on top.
    fn editor_config(&self) -> EditorConfig {
        EditorConfig::from_env().with_overrides(self.width, self.height, self.template.clone())
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.editor_config();
    tracing::debug!(width = config.grid.width, height = config.grid.height, "editor starting");

    let reader: Box<dyn BufRead> = if cli.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&cli.input).map_err(|source| CliError::Open { path: cli.input.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let mut engine = EngineCore::new(&config);
    let mut stdout = io::stdout().lock();
    let mut failed = 0_usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        let result = match parse_line(&line) {
            Ok(Some(cmd)) => execute(&mut engine, cmd),
            Ok(None) => continue,
            Err(err) => Err(err),
        };
        match result {
            Ok(out) => writeln!(stdout, "{out}")?,
            Err(err) => {
                tracing::warn!(line = lineno, code = err.error_code(), %err, "command failed");
                writeln!(stdout, "error[{}]: line {lineno}: {err}", err.error_code())?;
                failed += 1;
                if cli.strict {
                    break;
                }
            }
        }
    }

    if failed > 0 && cli.strict {
        return Err(CliError::Failed(failed));
    }
    Ok(())
}
