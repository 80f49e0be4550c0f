use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use version_generator::config;
use version_generator::ui::{self, OutputFormat};
use version_generator::GenerationData;

#[derive(clap::Parser)]
#[command(
    name = "version-generator",
    version,
    about = "Compute a build version code and name from CI build numbers or git history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Base version as major.minor.patch; patch becomes the patch offset"
    )]
    base: Option<GenerationData>,

    #[arg(short, long, help = "Directory in which to run git")]
    repo: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Name, help = "What to print")]
    format: OutputFormat,

    #[arg(short, long, help = "Print the generator priority list and exit")]
    list: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;

    if let Some(base) = args.base {
        config.set_generation_data(base);
    }
    if let Some(repo) = args.repo {
        config.git.repo_path = repo;
    }

    let selector = config.build_selector()?;

    if args.list {
        for (i, name) in selector.names().iter().enumerate() {
            println!("{}. {}", i + 1, name);
        }
        return Ok(());
    }

    let data = config.generation_data();
    ui::display_status(&format!(
        "Base version {}.{} with patch offset {}",
        data.major, data.minor, data.patch_offset
    ));

    let generator = selector.select()?;
    let version = generator.generate(&data)?;
    ui::display_generated(generator.name(), &version);

    println!("{}", ui::format_version(&version, args.format));
    Ok(())
}
