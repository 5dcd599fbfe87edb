use clap::Parser;
use dotenvy::dotenv;
use edat_uploader::infrastructure::staging;
use edat_uploader::{
    DryRunScan, EDAT_RESOURCE, EdatModule, LogNotifier, ModuleConfig, ModuleRunner, ScanInfo,
    ScanModule,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve which staged EDAT export a scan would receive, without uploading.
#[derive(Parser, Debug)]
#[command(name = "edat-uploader", version)]
struct Args {
    /// Scan type label, e.g. fMRI_EDP
    #[arg(long = "type")]
    scan_type: String,

    /// Subject label substituted into the file pattern
    #[arg(long)]
    subject: String,

    /// Session label; a trailing "b" marks a repeat session
    #[arg(long)]
    session: String,

    /// Project the scan belongs to
    #[arg(long, default_value = "-")]
    project: String,

    /// Staging pool root, overrides EDAT_LIMBO_DIR
    #[arg(long)]
    limbo: Option<PathBuf>,

    /// Treat the scan as already carrying an EDAT resource
    #[arg(long)]
    has_edat: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edat_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = ModuleConfig::from_env()?;
    if let Some(limbo) = args.limbo {
        config = config.with_limbo(limbo);
    }
    info!(
        "🚀 Starting {} (scan types: {})",
        config.module_name,
        config.scan_types.join(",")
    );
    staging::setup_staging(&config).await?;

    let mut info = ScanInfo::new(args.scan_type, args.subject, args.session);
    info.project_id = Some(args.project.clone());

    let mut scan = DryRunScan::new(info);
    if args.has_edat {
        scan = scan.with_resource(EDAT_RESOURCE);
    }

    let module = EdatModule::new(config, Arc::new(LogNotifier));
    let mut runner = ModuleRunner::new(module);

    let summary = runner.run_project(&args.project, "", &[scan]).await?;
    let module = runner.into_inner();

    println!(
        "{}: checked={} processed={} uploaded={} failed={}",
        module.name(),
        summary.checked,
        summary.processed,
        summary.uploaded,
        summary.failed
    );
    for line in module.report().lines() {
        println!("{}", line);
    }

    Ok(())
}
