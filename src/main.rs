//! rollcall CLI: membership reconciliation against a group directory.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use rollcall::config::RollcallConfig;
use rollcall::directory::memory::InMemoryDirectory;
use rollcall::directory::rest::RestGroupDirectory;
use rollcall::directory::GroupDirectory;
use rollcall::query;
use rollcall::session::MembershipSession;
use rollcall::subject::SubjectProfile;

#[derive(Parser)]
#[command(
    name = "rollcall",
    version,
    about = "Membership reconciliation against a group directory"
)]
struct Cli {
    /// Path to a rollcall.toml configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory base URL (overrides the configuration file).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Serve groups from a local JSON fixture instead of a remote directory.
    #[arg(long, global = true)]
    groups: Option<PathBuf>,

    /// Template mode: resolve against the root scope instead of the
    /// subject's own scope.
    #[arg(long, global = true)]
    template: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a subject's membership views against the directory.
    Reconcile {
        /// Path to the subject profile JSON.
        #[arg(long)]
        subject: PathBuf,

        /// Write the subject back after pruning stale static references.
        #[arg(long)]
        write: bool,
    },

    /// Search assignable candidate groups by name.
    Search {
        /// Path to the subject profile JSON.
        #[arg(long)]
        subject: PathBuf,

        /// Name filter; "*" returns the cached candidate sampling.
        #[arg(default_value = "*")]
        filter: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RollcallConfig::load(path)?,
        None => RollcallConfig::default(),
    };

    let directory: Box<dyn GroupDirectory> = match (&cli.groups, &cli.url) {
        (Some(path), _) => Box::new(InMemoryDirectory::from_json_file(path)?),
        (None, Some(url)) => Box::new(RestGroupDirectory::new(
            url.clone(),
            Duration::from_secs(config.directory.timeout_secs),
        )),
        (None, None) => Box::new(RestGroupDirectory::from_config(&config.directory)),
    };

    let mut session_config = config.session.clone();
    if cli.template {
        session_config = session_config.pinned_to_root();
    }
    let session = MembershipSession::new(directory, session_config);

    match cli.command {
        Commands::Reconcile {
            subject: subject_path,
            write,
        } => {
            let content = std::fs::read_to_string(&subject_path).into_diagnostic()?;
            let mut subject: SubjectProfile =
                serde_json::from_str(&content).into_diagnostic()?;

            let before = subject.static_memberships.len();
            let view = session.reconcile(&mut subject)?;
            let pruned = before - subject.static_memberships.len();

            println!("Reconciled \"{}\" in {}", subject.key, subject.scope);

            println!("Candidates ({}):", view.candidates.len());
            for (i, group) in view.candidates.iter().enumerate() {
                println!(
                    "  {}. \"{}\" / {} [{}]",
                    i + 1,
                    group.name,
                    group.key,
                    group.scope
                );
            }

            println!("Static memberships ({}):", view.static_memberships.len());
            for (i, membership) in view.static_memberships.iter().enumerate() {
                println!("  {}. \"{}\" / {}", i + 1, membership.name, membership.key);
            }

            match &view.dynamic_failure {
                Some(err) => println!("Dynamic memberships: unavailable ({err})"),
                None => {
                    println!("Dynamic memberships ({}):", view.dynamic_names.len());
                    for (i, name) in view.dynamic_names.iter().enumerate() {
                        println!("  {}. \"{name}\"", i + 1);
                    }
                }
            }

            if pruned > 0 {
                println!("Pruned {pruned} stale static reference(s).");
                if write {
                    let json = serde_json::to_string_pretty(&subject).into_diagnostic()?;
                    std::fs::write(&subject_path, json).into_diagnostic()?;
                    println!("Subject written to {}", subject_path.display());
                } else {
                    println!("(re-run with --write to persist the pruned subject)");
                }
            }
        }

        Commands::Search {
            subject: subject_path,
            filter,
        } => {
            let content = std::fs::read_to_string(&subject_path).into_diagnostic()?;
            let subject: SubjectProfile =
                serde_json::from_str(&content).into_diagnostic()?;

            // Wildcard answers come from the cached sampling; warm it with a
            // scratch copy so the stored subject is not mutated.
            if query::is_unfiltered(&filter) {
                let mut scratch = subject.clone();
                session.reconcile(&mut scratch)?;
            }

            let hits = session.search(&subject.scope, &filter)?;
            if hits.is_empty() {
                println!("No assignable groups match \"{filter}\".");
            } else {
                println!("Assignable groups ({}):", hits.len());
                for (i, group) in hits.iter().enumerate() {
                    println!(
                        "  {}. \"{}\" / {} [{}]",
                        i + 1,
                        group.name,
                        group.key,
                        group.scope
                    );
                }
            }
        }
    }

    Ok(())
}
