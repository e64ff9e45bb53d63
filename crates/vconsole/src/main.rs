//! vconsole - administration console for proof templates and verifier users.
//!
//! Interactive TUI by default; `--dump` prints one table page and exits.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use vconsole_core::api::mock::MockApi;
use vconsole_core::api::{ApiClient, VerifierApi};
use vconsole_core::notify::{Notifier, NoticeLevel, ToastQueue};
use vconsole_core::pages::{TableCommand, TemplatesPage, UsersPage, run_to_completion};
use vconsole_core::session::Session;
use vconsole_core::table::PageSize;
use vconsole_core::tui::App;
use vconsole_core::view::{templates_table, users_table};

/// UI refresh interval; toasts expire on ticks.
const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpTable {
    Templates,
    Users,
}

/// Administration console for proof templates and verifier users.
#[derive(Parser)]
#[command(name = "vconsole", about = "Proof template and verifier user console", version)]
struct Args {
    /// Base URL of the verifier API (e.g. https://verifier.example.org/api).
    #[arg(long, env = "VCONSOLE_API_BASE_URL", required_unless_present = "demo")]
    base_url: Option<String>,

    /// Bearer token sent with every request.
    #[arg(long, env = "VCONSOLE_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File holding the bearer token. Used when --token is not given.
    #[arg(long, env = "VCONSOLE_AUTH_TOKEN_FILE", value_name = "PATH")]
    token_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, env = "VCONSOLE_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Rows per table page: 5, 10, 20, 30, 40 or 50.
    #[arg(long, default_value = "5", value_parser = parse_page_size)]
    page_size: PageSize,

    /// Log file. The terminal belongs to the UI, so logs never go to stderr.
    #[arg(long, env = "VCONSOLE_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,

    /// Use an in-memory backend with sample data.
    #[arg(long)]
    demo: bool,

    /// Ring the terminal bell when an error notice appears.
    #[arg(long, env = "VCONSOLE_BELL")]
    bell: bool,

    /// Print one page of a table and exit.
    #[arg(long, value_enum, value_name = "TABLE")]
    dump: Option<DumpTable>,

    /// Global filter applied before dumping.
    #[arg(long, requires = "dump", default_value = "")]
    filter: String,

    /// 1-based page to dump.
    #[arg(long, requires = "dump", default_value = "1")]
    page: usize,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid page size '{}': {}", s, e))?;
    PageSize::try_from(n).map_err(|e| e.to_string())
}

/// Initializes the tracing subscriber writing to `log_file`.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool, log_file: &Path) -> std::io::Result<()> {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["vconsole", "vconsole_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

/// `--token`, else the contents of `--token-file`.
fn read_token(args: &Args) -> Result<Option<String>, String> {
    if let Some(token) = &args.token {
        return Ok(Some(token.clone()));
    }
    match &args.token_file {
        Some(path) => fs::read_to_string(path)
            .map(Some)
            .map_err(|e| format!("cannot read token file {}: {}", path.display(), e)),
        None => Ok(None),
    }
}

fn dump(args: &Args, api: &dyn VerifierApi, session: Arc<Session>) -> Result<String, String> {
    let toasts = Arc::new(ToastQueue::default());
    let notifier: Arc<dyn Notifier> = toasts.clone();
    let commands = [
        TableCommand::Filter(args.filter.clone()),
        TableCommand::GoToPage(args.page.saturating_sub(1)),
    ];

    let text = match args.dump {
        Some(DumpTable::Templates) => {
            let mut page = TemplatesPage::new(session, notifier, args.page_size);
            let initial = page.load();
            run_to_completion(initial, |out| {
                let result = out.request.dispatch(api);
                page.complete(out.ticket, result)
            });
            for command in commands {
                page.table_command(command);
            }
            templates_table(page.table(), page.templates()).to_text()
        }
        Some(DumpTable::Users) => {
            let mut page = UsersPage::new(session, notifier, args.page_size);
            let initial = page.load();
            run_to_completion(initial, |out| {
                let result = out.request.dispatch(api);
                page.complete(out.ticket, result)
            });
            for command in commands {
                page.table_command(command);
            }
            users_table(page.table(), page.users()).to_text()
        }
        None => return Err("nothing to dump".to_string()),
    };

    match toasts.latest() {
        Some(notice) if notice.level == NoticeLevel::Error => Err(notice.message),
        _ => Ok(text),
    }
}

fn main() {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("vconsole.log"));
    if let Err(e) = init_logging(args.verbose, args.quiet, &log_file) {
        eprintln!("cannot open log file {}: {}", log_file.display(), e);
        process::exit(1);
    }
    info!("vconsole {} starting", env!("CARGO_PKG_VERSION"));

    let token = match read_token(&args) {
        Ok(token) => token,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            process::exit(1);
        }
    };
    // The demo backend still checks the token; give it one when none is set.
    let token = match token {
        None if args.demo => Some("demo".to_string()),
        token => token,
    };
    let session = Arc::new(Session::new(token));
    if let Some(principal) = session.principal() {
        info!(principal, expires_at = ?session.expires_at(), "signed in");
    }

    let (api, backend): (Arc<dyn VerifierApi>, String) = match (&args.base_url, args.demo) {
        (_, true) => {
            info!("using in-memory demo backend");
            (
                Arc::new(MockApi::seeded().with_session(session.clone())),
                "demo".to_string(),
            )
        }
        (Some(base_url), false) => {
            match ApiClient::new(base_url, session.clone(), Duration::from_secs(args.timeout)) {
                Ok(client) => {
                    info!(base_url = client.base_url(), timeout = args.timeout, "using verifier API");
                    let label = client.base_url().to_string();
                    (Arc::new(client), label)
                }
                Err(e) => {
                    error!("cannot create API client: {e}");
                    eprintln!("cannot create API client: {e}");
                    process::exit(1);
                }
            }
        }
        (None, false) => {
            eprintln!("--base-url is required unless --demo is given");
            process::exit(2);
        }
    };

    if args.dump.is_some() {
        match dump(&args, api.as_ref(), session) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                error!("dump failed: {e}");
                eprintln!("{e}");
                process::exit(1);
            }
        }
        return;
    }

    let mut app = App::new(api, session, args.page_size, backend).with_bell(args.bell);
    if let Err(e) = app.run(TICK_RATE) {
        error!("terminal error: {e}");
        eprintln!("terminal error: {e}");
        process::exit(1);
    }
}
