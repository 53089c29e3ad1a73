use clap::Parser;
use logseqify::transform::TransformOptions;
use logseqify::{config, convert, output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "logseqify")]
#[command(about = "Convert a Joplin Markdown export into a Logseq graph")]
#[command(long_about = "\
Convert a Joplin Markdown export into a Logseq graph

Reads every .md file under joplin-input/ (skipping _resources/), rewrites its
front matter for Logseq, and writes it to logseq-output/pages/ with nested
notebooks flattened into the file name. Attachments linked from a note are
copied from joplin-input/_resources/ to logseq-output/assets/.

  joplin-input/Work/Meeting.md  →  logseq-output/pages/Work___Meeting.md

Layout and tokens can be overridden with a logseqify.toml in the working
directory. Set RUST_LOG to change log verbosity (default: info).")]
#[command(version)]
struct Cli {
    /// Drop title, author, tags and coordinates from the front matter
    #[arg(long)]
    frontmatter_cleanup: bool,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("logseqify=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(&std::env::current_dir()?)?;
    let options = TransformOptions {
        cleanup_frontmatter: cli.frontmatter_cleanup,
    };

    let summary = convert::run(&config, options)?;
    output::print_summary(&summary, &config);

    Ok(())
}
