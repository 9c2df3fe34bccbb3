use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thumbfall::fallback::FallbackPath;
use thumbfall::{batch, config, fallback, output, sources, value::Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "thumbfall")]
#[command(about = "Thumbnail renderer and fallback-path resolver")]
#[command(long_about = "\
Thumbnail renderer and fallback-path resolver

Renders the thumbnails declared in thumbfall.toml for each source image.
Thumbnails are named after their key and the source's file stem:

  photos/2024/sunset.jpg  --render-->  out/2024/list.sunset.jpg
                                       out/2024/detail.sunset.jpg

Fallback paths are dotted paths walked from a document root. Numeric
segments index lists; anything that breaks the chain reads as not found:

  thumbfall resolve --path gallery.images.0.caption post.json

Set RUST_LOG (e.g. RUST_LOG=thumbfall=debug) for diagnostics on stderr.

Run 'thumbfall gen-config' to generate a documented thumbfall.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when missing)
    #[arg(long, default_value = "thumbfall.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render thumbnails for images and directories of images
    Render {
        /// Output directory
        #[arg(long, default_value = "thumbnails")]
        output: PathBuf,
        /// Render only these thumbnail keys (repeatable)
        #[arg(long = "only", value_name = "KEY")]
        only: Vec<String>,
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Walk a fallback path through a JSON document
    Resolve {
        /// Dotted path to walk from the document root
        #[arg(long, required_unless_present = "field", conflicts_with = "field")]
        path: Option<String>,
        /// Read a fallback field declared in the config
        #[arg(long)]
        field: Option<String>,
        /// JSON document
        document: PathBuf,
    },
    /// Print a stock thumbfall.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            output: output_dir,
            only,
            inputs,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let set = config.thumbnail_set()?;
            let found = sources::collect_sources(&inputs)?;
            tracing::info!(sources = found.len(), thumbnails = set.defs().len(), "rendering");
            let outcomes = batch::render_sources(&found, &set, &only, &config.codec, &output_dir)?;
            output::print_render_output(&outcomes);
        }
        Command::Resolve {
            path,
            field,
            document,
        } => {
            let json: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&document)?)?;
            let root = Value::from(json);

            let (lines, found) = if let Some(name) = field {
                let config = config::load_config(&cli.config)?;
                let field = config
                    .fallback_field(&name)
                    .ok_or_else(|| format!("no fallback field {name:?} in config"))?;
                let value = field.read(&root)?;
                (output::format_field_value(&name, &value), value.value().is_some())
            } else {
                let path = FallbackPath::parse(&path.ok_or("--path or --field is required")?)?;
                let resolution = fallback::resolve(&root, &path);
                (output::format_resolution(&path, &resolution), resolution.is_found())
            };
            output::print_lines(&lines);
            if !found {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
