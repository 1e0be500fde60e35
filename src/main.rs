use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use storyshelf::markdown::CommonMark;
use storyshelf::pipeline::{self, BuildOptions, Collaborators};
use storyshelf::templates::Theme;
use storyshelf::{config, output, scan};

#[derive(Parser)]
#[command(name = "storyshelf")]
#[command(about = "Static site generator for serialized fiction")]
#[command(long_about = "\
Static site generator for serialized fiction

Genres are directories, stories are directories inside them, and every
Markdown file in a story is a chapter. Chapters are ordered by number, and
each page links to the previous and next chapter of its story.

Content structure:

  content/
  ├── config.toml              # Site config (optional)
  ├── fantasy/                 # Genre
  │   ├── red-lily/            # Story
  │   │   ├── cover.png        # Cover (png, jpg or jpeg)
  │   │   ├── 1.md             # Chapter 1
  │   │   ├── 2.md
  │   │   └── 4.md             # Gaps are fine: 2 links straight to 4
  │   └── glass-tower/
  │       ├── epilogue.md      # Non-numeric: ordered by filename
  │       └── prologue.md
  └── mystery/
      └── ...

Output mirrors the input (1.md → 1.html) plus index.html and static/.

Run 'storyshelf gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory (replaced on every build)
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Static assets directory, mirrored to <output>/static
    #[arg(long = "static", default_value = "static", global = true)]
    static_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the whole site: chapters, covers, index and static assets
    Build,
    /// Validate the content directory and show what would be built
    Check,
    /// Print the scanned catalog as JSON
    Scan,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Initialize logging based on verbosity flag. `RUST_LOG` still wins.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let theme = Theme::new(&site_config);
            let markdown = CommonMark::new();
            let collaborators = Collaborators {
                markdown: &markdown,
                page: &theme,
                index: &theme,
            };
            let options = BuildOptions {
                content_root: cli.source.clone(),
                output_root: cli.output.clone(),
                static_root: cli.static_dir.clone(),
                site_title: site_config.title.clone(),
                chapter_label: site_config.chapter_label.clone(),
                year: chrono::Local::now().year(),
            };

            println!(
                "==> Building {} \u{2192} {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = pipeline::build(&options, collaborators, &mut |event| {
                output::print_build_event(event)
            })?;
            println!("==> {}", output::format_build_summary(&report, &cli.output));
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let catalog = scan::scan(&cli.source)?;
            output::print_scan_output(&catalog, &site_config.chapter_label);
            println!("==> Content is valid");
        }
        Command::Scan => {
            let catalog = scan::scan(&cli.source)?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
