use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use git_dist_publish::cli::{run_publish_workflow, PublishWorkflowArgs};
use git_dist_publish::{config, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-dist-publish",
    about = "Publish a package's build output as tagged commits in a distribution git repository"
)]
struct Args {
    #[arg(long = "tag", value_name = "NAME", help = "Tag to create and push (repeatable)")]
    tags: Vec<String>,

    #[arg(long, help = "Also tag with v<version> from package.json")]
    tag_version: bool,

    #[arg(long, help = "Move tags that already exist")]
    force_tags: bool,

    #[arg(long, help = "Commit and tag in the clone but do not push")]
    dry_run: bool,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "URL", help = "Distribution repository to publish to")]
    dist_repo: Option<String>,

    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Development repository holding the package"
    )]
    directory: PathBuf,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, help = "Print version information")]
    version: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.version {
        println!("git-dist-publish {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        ui::display_error(&format!("{:#}", e));
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref(), &args.directory)
        .context("Error loading config")?;
    tracing::debug!(?config, "configuration");

    let workflow_args = PublishWorkflowArgs {
        directory: args.directory,
        tags: args.tags,
        tag_version: args.tag_version,
        force_tags: args.force_tags,
        dry_run: args.dry_run,
        dist_repo: args.dist_repo,
    };

    let result = run_publish_workflow(workflow_args, &config)
        .await
        .context("Publish failed")?;

    if result.pushed {
        ui::display_install_instructions(
            &result.package,
            &result.url,
            &result.tags,
            &result.commit.to_short_string(),
        );
    } else {
        ui::display_dry_run_notice(&result.clone_path);
    }
    Ok(())
}
