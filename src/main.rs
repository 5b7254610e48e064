// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use entity_tracker::{
    AuthGate, Config, EntityClient, HttpTransport, Notice, ResourceKind, SessionStore,
    Synchronizer, UploadForm, VERSION,
};

type App = Synchronizer<HttpTransport>;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("ui");

    let config = Config::from_env();
    // Logs would tear the alternate screen, so the TUI stays quiet unless RUST_LOG says otherwise
    init_tracing(&config, if command == "ui" { "off" } else { "warn" });

    if matches!(command, "help" | "--help" | "-h") {
        print_usage();
        return Ok(());
    }
    if command == "--version" {
        println!("entity-tracker {}", VERSION);
        return Ok(());
    }

    let mut app = build(&config)?;

    match command {
        "ui" => run_ui_mode(app).await,
        "login" => {
            let [user, password] = expect_args::<2>(&args, "login <username> <password>")?;
            let ok = app.login(&user, &password).await;
            finish(&mut app, ok, &format!("✓ Logged in as {}", user))
        }
        "register" => {
            if args.len() < 3 {
                bail!("usage: entity-tracker register <username> <password> [email]");
            }
            let ok = app.register(&args[1], &args[2], args.get(3).cloned()).await;
            finish(&mut app, ok, &format!("✓ Registered {}", args[1]))
        }
        "logout" => {
            app.logout().context("Failed to clear saved session")?;
            println!("✓ Logged out");
            Ok(())
        }
        "list" => {
            require_login(&app)?;
            app.load_collection().await;
            for line in app.view().list.text_lines() {
                println!("{}", line);
            }
            finish(&mut app, true, "")
        }
        "show" => {
            let [id] = expect_args::<1>(&args, "show <entity_id>")?;
            require_login(&app)?;
            let loaded = app.load_detail(parse_id(&id)?).await;
            for line in app.view().detail.text_lines() {
                println!("{}", line);
            }
            finish(&mut app, loaded.is_ok(), "")?;
            loaded.map(|_| ()).with_context(|| format!("Failed to load entity {}", id))
        }
        "upload" => {
            if args.len() < 3 {
                bail!("usage: entity-tracker upload <entity_id> <file> [title] [document_type]");
            }
            require_login(&app)?;
            let form = UploadForm {
                file: Some(PathBuf::from(&args[2])),
                title: args.get(3).cloned(),
                document_type: args.get(4).cloned(),
            };
            let ok = app.upload_document(parse_id(&args[1])?, form).await;
            finish(&mut app, ok, "✓ Document uploaded")
        }
        "download" => {
            let [id, out] = expect_args::<2>(&args, "download <document_id> <output_path>")?;
            require_login(&app)?;
            match app.download_document(parse_id(&id)?, &PathBuf::from(&out)).await {
                Ok(bytes) => finish(&mut app, true, &format!("✓ Saved {} bytes to {}", bytes, out)),
                Err(err) => {
                    finish(&mut app, true, "")?;
                    Err(anyhow!(err).context("Download failed"))
                }
            }
        }
        "view-url" => {
            let [id] = expect_args::<1>(&args, "view-url <document_id>")?;
            require_login(&app)?;
            let url = app
                .document_view_url(parse_id(&id)?)
                .ok_or_else(|| anyhow!("Not logged in"))?;
            println!("{}", url);
            Ok(())
        }
        "delete" => {
            let [kind, id] = expect_args::<2>(&args, "delete <entity|account|task|document> <id>")?;
            require_login(&app)?;
            let kind = parse_kind(&kind)?;
            let mut ask = |prompt: &str| confirm_on_stdin(prompt);
            let ok = app.remove(kind, parse_id(&id)?, &mut ask).await;
            finish(&mut app, ok, &format!("✓ Deleted {}", kind.noun()))
        }
        "health" => {
            let status = app
                .client()
                .health()
                .await
                .with_context(|| format!("API at {} is not reachable", config.api_url))?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other)
        }
    }
}

fn init_tracing(config: &Config, default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build(config: &Config) -> Result<App> {
    let store = SessionStore::open(&config.session_path).with_context(|| {
        format!("Failed to open session store {}", config.session_path.display())
    })?;
    let gate = AuthGate::restore(store).context("Failed to read saved session")?;
    let client = EntityClient::new(HttpTransport::new(config.api_url.clone()));
    Ok(Synchronizer::new(client, gate, config.empty_message.clone()))
}

fn expect_args<const N: usize>(args: &[String], usage: &str) -> Result<[String; N]> {
    let rest = args.get(1..).unwrap_or_default();
    if rest.len() < N {
        bail!("usage: entity-tracker {}", usage);
    }
    Ok(std::array::from_fn(|i| rest[i].clone()))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("'{}' is not a valid id", raw))
}

fn parse_kind(raw: &str) -> Result<ResourceKind> {
    match raw {
        "entity" => Ok(ResourceKind::Entity),
        "account" => Ok(ResourceKind::Account),
        "task" => Ok(ResourceKind::Task),
        "document" => Ok(ResourceKind::Document),
        other => bail!("unknown record kind: {}", other),
    }
}

fn require_login(app: &App) -> Result<()> {
    if !app.gate().is_logged_in() {
        bail!("Not logged in. Run: entity-tracker login <username> <password>");
    }
    Ok(())
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// Print whatever the synchronizer left for the user; alerts fail the command
fn finish(app: &mut App, ok: bool, success: &str) -> Result<()> {
    match app.take_notice() {
        Some(Notice::Alert(text)) => bail!("❌ {}", text),
        Some(Notice::Info(text)) => println!("{}", text),
        None if ok && !success.is_empty() => println!("{}", success),
        None => {}
    }
    Ok(())
}

fn print_usage() {
    println!("entity-tracker {}", VERSION);
    println!();
    println!("Usage: entity-tracker [command]");
    println!();
    println!("  ui                                   Interactive terminal UI (default)");
    println!("  login <username> <password>          Log in and save the session");
    println!("  register <username> <password> [email]");
    println!("  logout                               Forget the saved session");
    println!("  list                                 List entities");
    println!("  show <entity_id>                     Entity with accounts, tasks and documents");
    println!("  upload <entity_id> <file> [title] [type]");
    println!("  download <document_id> <output_path>");
    println!("  view-url <document_id>               Browser URL for a document");
    println!("  delete <entity|account|task|document> <id>");
    println!("  health                               Check the API is reachable");
}

#[cfg(feature = "tui")]
async fn run_ui_mode(app: App) -> Result<()> {
    let mut app = ui::App::new(app);
    ui::run_ui(&mut app).await?;
    println!("✅ Entity Tracker closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
async fn run_ui_mode(_app: App) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the one-shot commands, see: entity-tracker help");
    std::process::exit(1);
}
