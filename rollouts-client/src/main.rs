//! kubectl-argo-rollouts-get: tree view of a rollout or an experiment.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use rollouts_client::ansi::ColorSupport;
use rollouts_client::cmd::{KubeNameLister, KubeTreeSource};
use rollouts_client::{NameCompleter, ParentKind, RenderOptions, WatchLoop};

/// Show Argo Rollouts resources as a tree
#[derive(Parser, Debug)]
#[command(name = "kubectl-argo-rollouts-get")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Namespace of the resource (default: namespace of the current context)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Directory that receives rollouts.log
    #[arg(long, global = true, env = "ROLLOUTS_LOG_DIR", default_value_os_t = std::env::temp_dir())]
    log_dir: PathBuf,

    /// OTLP collector endpoint, used when built with telemetry
    #[arg(
        long,
        global = true,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    otlp_endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get details about a rollout or experiment
    #[command(subcommand)]
    Get(GetCommand),

    /// Print shell completion candidates followed by `:<directive>`
    #[command(name = "__complete", hide = true)]
    Complete {
        kind: String,
        #[arg(default_value = "")]
        to_complete: String,
    },
}

#[derive(Subcommand, Debug)]
enum GetCommand {
    /// Get details about a rollout
    #[command(visible_aliases = ["ro", "rollouts"])]
    Rollout(GetArgs),

    /// Get details about an experiment
    #[command(visible_aliases = ["exp", "experiments"])]
    Experiment(GetArgs),
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Resource name, also accepted as `<type>/<name>`
    name: String,

    /// Keep watching for changes
    #[arg(short, long)]
    watch: bool,

    /// Do not colorize output
    #[arg(long)]
    no_color: bool,

    /// Stop watching after this many seconds, 0 watches until interrupted
    #[arg(long, default_value_t = 0)]
    timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging is best effort, the tree is still useful without it
    if let Err(e) =
        rollouts_client::setup_logger(&cli.log_dir.to_string_lossy(), &cli.otlp_endpoint)
    {
        eprintln!("warning: logging disabled: {e}");
    }
    rollouts_client::install_panic_hook();

    let result = match cli.command {
        Command::Get(get) => run_get(cli.namespace, cli.context, get).await,
        Command::Complete { kind, to_complete } => {
            complete(cli.namespace, cli.context, &kind, &to_complete).await
        }
    };

    rollouts_client::shutdown_logger();
    result
}

async fn run_get(
    namespace: Option<String>,
    context: Option<String>,
    command: GetCommand,
) -> Result<()> {
    let (parent, args) = match command {
        GetCommand::Rollout(args) => (ParentKind::Rollout, args),
        GetCommand::Experiment(args) => (ParentKind::Experiment, args),
    };
    let name = resource_name(&args.name).to_string();
    let options = RenderOptions {
        watch: args.watch,
        no_color: args.no_color,
        timeout: (args.timeout_seconds > 0).then(|| Duration::from_secs(args.timeout_seconds)),
        color_support: ColorSupport::detect(),
        ..Default::default()
    };
    info!(kind = parent.kind(), %name, ?options, "get");

    let config = Config::from_kubeconfig(&KubeConfigOptions {
        context,
        cluster: None,
        user: None,
    })
    .await
    .context("failed to load kubeconfig")?;
    let client = Client::try_from(config).context("failed to create kubernetes client")?;
    let source = KubeTreeSource::new(client, namespace, parent, name.clone());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let exit = WatchLoop::new(&source, &options, cancel)
        .run(&mut out)
        .await
        .with_context(|| format!("failed to get {} {name}", parent.kind()))?;
    debug!(?exit, "get finished");

    Ok(())
}

async fn complete(
    namespace: Option<String>,
    context: Option<String>,
    kind: &str,
    to_complete: &str,
) -> Result<()> {
    let completer = NameCompleter::new(KubeNameLister::new(context), namespace);
    let comps = completer.complete(to_complete, kind).await;

    let mut out = io::stdout().lock();
    for candidate in &comps.candidates {
        writeln!(out, "{candidate}")?;
    }
    writeln!(out, ":{}", comps.directive.bits())?;
    out.flush()?;
    Ok(())
}

/// `rollouts/guestbook` and `guestbook` both name `guestbook`.
fn resource_name(arg: &str) -> &str {
    arg.rsplit_once('/').map_or(arg, |(_, name)| name)
}
