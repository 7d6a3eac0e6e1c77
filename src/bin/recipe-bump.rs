//! recipe-bump - update a recipe to a GitHub release
//!
//! Usage:
//!   recipe-bump <RELEASE_URL> -o <RECIPE>                    Positional strategy
//!   recipe-bump <RELEASE_URL> -o <RECIPE> --strategy platform  Match by platform suffix
//!   recipe-bump <RELEASE_URL> -o <RECIPE> --dry-run          Print instead of writing

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use recipe_bump::{
    BumpError, ChecksumResolver, Endpoints, HttpClient, Policy, RecipePatcher, ReleaseReference,
    ReleaseTarget, Strategy, output, parse_release_reference, read_recipe, resolve_latest,
    write_recipe_atomic,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-bump")]
#[command(about = "Bump a recipe's version and sha256 checksums to a GitHub release")]
#[command(version)]
struct Cli {
    /// Release page URL, e.g. https://github.com/jetify-com/devbox/releases/tag/0.16.0
    release_url: String,

    /// Recipe file to update in place
    #[arg(short, long, env = "RECIPE_BUMP_RECIPE")]
    output: PathBuf,

    /// Application name used in asset names (defaults to the repository name)
    #[arg(short = 'n', long)]
    app_name: Option<String>,

    /// How sha256 lines are matched to checksums
    #[arg(long, value_enum, default_value_t = StrategyArg::Positional)]
    strategy: StrategyArg,

    /// With --strategy platform, leave platforms without a checksum unchanged
    #[arg(long)]
    tolerant: bool,

    /// Print the patched recipe instead of writing it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Pair each url with the sha256 line below it
    Positional,
    /// Match url lines by <app>_<version>_<os>_<arch>.tar.gz
    Platform,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    if cli.dry_run {
        output::status_to_stderr();
    }

    let target = parse_release_reference(&cli.release_url)?;
    // Before any network access
    let original = read_recipe(&cli.output)?;

    let client = HttpClient::new();
    let endpoints = Endpoints::from_env();

    let release = match target {
        ReleaseTarget::Tagged(release) => release,
        ReleaseTarget::Latest {
            organization,
            repository,
        } => latest_release(&client, &endpoints, &organization, &repository)?,
    };

    output::action(&format!(
        "Resolving checksums for {}/{} {}",
        release.organization,
        release.repository,
        release.version()
    ));
    if !release.is_semver() {
        output::warning(&format!(
            "version '{}' is not semver, writing it unchanged",
            release.version()
        ));
    }

    let resolution = ChecksumResolver::new(&client, &endpoints).resolve(&release)?;
    output::success(&format!(
        "Found {} checksum(s) in {}",
        resolution.checksums.len(),
        resolution.source
    ));
    for (filename, checksum) in resolution.checksums.iter() {
        output::checksum_row(filename, checksum.as_str());
    }

    let strategy = match cli.strategy {
        StrategyArg::Positional => Strategy::Positional,
        StrategyArg::Platform => Strategy::Platform {
            app_name: cli
                .app_name
                .clone()
                .unwrap_or_else(|| release.repository.clone()),
        },
    };
    let policy = if cli.tolerant {
        Policy::Tolerant
    } else {
        Policy::Strict
    };

    let patched = RecipePatcher::new(release.version(), &resolution.checksums)
        .strategy(strategy)
        .policy(policy)
        .apply(&original)
        .with_context(|| format!("{} was not modified", cli.output.display()))?;

    for warning in &patched.report.warnings {
        output::warning(&warning.to_string());
    }

    if cli.dry_run {
        print!("{}", patched.text);
        output::info(&format!(
            "Dry run: {} not modified",
            cli.output.display()
        ));
        return Ok(());
    }

    write_recipe_atomic(&cli.output, &patched.text)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    output::success(&format!(
        "Updated {} to version {}",
        cli.output.display(),
        patched.report.version
    ));
    let count = patched.report.updated_count();
    output::info(&format!(
        "Replaced {} sha256 {}",
        count,
        if count == 1 { "entry" } else { "entries" }
    ));

    Ok(())
}

fn latest_release(
    client: &HttpClient,
    endpoints: &Endpoints,
    organization: &str,
    repository: &str,
) -> Result<ReleaseReference, BumpError> {
    let pb = output::spinner(&format!(
        "Looking up latest release of {}/{}",
        organization, repository
    ));
    match resolve_latest(client, endpoints, organization, repository) {
        Ok(release) => {
            output::progress_success(pb, &format!("Latest release is {}", release.tag));
            Ok(release)
        }
        Err(e) => {
            output::progress_fail(pb, "Could not determine latest release");
            Err(e)
        }
    }
}
