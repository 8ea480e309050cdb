use std::path::PathBuf;

use clap::Parser;
use dep_compliance::compliance::{
    CheckOptions, CheckRequest, PackageManager, Reduction, TracingSink, run_fleet,
};
use dep_compliance::config::ClientConfig;
use dep_compliance::logging::{self, LogFormat};
use dep_compliance::source::{GitHubClient, RepositoryPattern};

#[derive(Parser)]
#[command(name = "dep-compliance")]
#[command(
    version,
    about = "Audit GitHub repositories for library or package manager versions"
)]
struct Cli {
    /// Repositories to check (`owner/name` or `owner/*`)
    #[arg(required = true)]
    repos: Vec<RepositoryPattern>,

    /// Semver range the version must satisfy
    #[arg(short, long)]
    requirement: Option<String>,

    /// Library to look up in the lockfile
    #[arg(short, long)]
    library: Option<String>,

    /// Check the `packageManager` pin in package.json instead of a library
    #[arg(short, long, value_enum)]
    package_manager: Option<PackageManager>,

    /// Keep only the lowest or highest installed version
    #[arg(long, value_enum)]
    reduce: Option<Reduction>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Also append log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(cli.log_format, cli.log_file.as_deref())?;

    let request = CheckRequest::new(CheckOptions {
        requirement: cli.requirement,
        library: cli.library,
        package_manager: cli.package_manager,
        reduce: cli.reduce,
    })?;

    let client = GitHubClient::new(ClientConfig::new(cli.api_url, cli.token))?;

    let summary = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run_fleet(
            &client,
            &client,
            &TracingSink,
            &cli.repos,
            &request,
        ));

    tracing::info!(
        checked = summary.checked,
        compliant = summary.compliant,
        non_compliant = summary.non_compliant,
        skipped = summary.skipped,
        failed = summary.failed,
        "Fleet run complete"
    );

    Ok(())
}
