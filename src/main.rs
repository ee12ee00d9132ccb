//! Cairn - HTTP server for the generated page

use std::path::PathBuf;
use std::sync::Arc;

use cairn::app::CairnApp;
use cairn::core::logging;
use cairn::generation::{StackBuilder, StackConfig};
use cairn_serve::{FallbackPolicy, HttpServer, ServeConfig};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    stack_config: Option<PathBuf>,
    bind: Option<String>,
    port: Option<u16>,
    assets: Option<PathBuf>,
    fallback: Option<FallbackPolicy>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "--stack-config" => parsed.stack_config = Some(PathBuf::from(value()?)),
            "-b" | "--bind" => parsed.bind = Some(value()?),
            "-p" | "--port" => {
                let v = value()?;
                parsed.port = Some(v.parse().map_err(|_| format!("invalid port: {v}"))?);
            }
            "-a" | "--assets" => parsed.assets = Some(PathBuf::from(value()?)),
            "--fallback" => {
                let v = value()?;
                parsed.fallback = Some(v.parse().map_err(|e| format!("{e}"))?);
            }
            "-h" | "--help" | "help" => return Err("show_help".to_string()),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(parsed)
}

fn print_help() {
    println!("Cairn Server");
    println!("============");
    println!();
    println!("Usage: cairn [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>      Server config JSON (bind, port, assets, fallback)");
    println!("  --stack-config <FILE>    Generator config JSON");
    println!("  -b, --bind <ADDR>        Interface to bind (default: 127.0.0.1)");
    println!("  -p, --port <N>           Port (default: {})", cairn_serve::DEFAULT_PORT);
    println!("  -a, --assets <DIR>       Static asset directory");
    println!("  --fallback <index|404>   Unmatched paths: serve the page or 404 (default: 404)");
    println!();
    println!("Routes:");
    println!("  /, /index.html           Page with a fresh cairn");
    println!("  /cairn.svg[?seed=N]      Fresh drawing");
    println!("  /cairn.json[?seed=N]     Fresh rock list");
}

fn build_config(args: &Args) -> Result<ServeConfig, String> {
    let mut config = match &args.config {
        Some(path) => ServeConfig::load(path).map_err(|e| e.to_string())?,
        None => ServeConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(assets) = &args.assets {
        config.assets = Some(assets.clone());
    }
    if let Some(fallback) = args.fallback {
        config.fallback = fallback;
    }
    Ok(config)
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if e == "show_help" {
                print_help();
                return;
            }
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    logging::init();
    log::info!("Cairn starting...");

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = build_config(&args)?;
    let addr = config.socket_addr().map_err(|e| e.to_string())?;

    let mut app = CairnApp::from_config(&config).map_err(|e| e.to_string())?;
    if let Some(path) = &args.stack_config {
        let stack = StackConfig::load(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        log::info!("Loaded generator config from {}", path.display());
        app = app.with_builder(StackBuilder::try_new(stack).map_err(|e| e.to_string())?);
    }
    log::info!("Unmatched paths: {:?}", config.fallback);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {e}"))?;

    rt.block_on(async move {
        let handler = Arc::new(tokio::sync::Mutex::new(app));
        let server = HttpServer::start(handler, addr).await.map_err(|e| e.to_string())?;
        log::info!("Open http://{} in a browser", server.local_addr());
        server.wait().await;
        Ok::<(), String>(())
    })
}
