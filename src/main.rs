mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use threads_sim::{EngineConfig, Feed, FeedState, NotificationFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "threads-sim", about = "Social feed simulator with scripted bot replies")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Post(PostArgs),
    Serve(ServeArgs),
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct PostArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    no_replies: bool,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long)]
    path: Option<PathBuf>,
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8788)]
    port: u16,
    #[arg(long, default_value = "../webapp/dist")]
    web_root: String,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = EngineConfig::load(cli.config)?;
    let command = cli.command.unwrap_or(Command::Post(PostArgs::default()));

    match command {
        Command::Post(args) => run_post(args, config).await,
        Command::Serve(args) => server::serve(args, config).await,
        Command::InitConfig(args) => run_init_config(args, config, config_path),
    }
}

fn run_init_config(
    args: InitConfigArgs,
    config: EngineConfig,
    config_path: Option<PathBuf>,
) -> Result<(), String> {
    let path = args
        .path
        .or(config_path)
        .ok_or_else(|| "missing config path: pass --path".to_string())?;
    if path.exists() && !args.force {
        return Err(format!(
            "config already exists at {}: pass --force to overwrite",
            path.display()
        ));
    }
    config.write(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn run_post(args: PostArgs, mut config: EngineConfig) -> Result<(), String> {
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.no_replies {
        config.enabled = false;
    }

    let text = read_text(args.text)?;
    let feed = Feed::new(FeedState::with_default_rng(&config));
    let post = feed.add_post(&text, None).await?;
    println!("Posted {}: {}", post.id, post.content);

    let wait = Duration::from_millis(config.reply_delay_ms + 50);
    tokio::time::sleep(wait).await;

    let state = feed.lock().await;
    let replies: Vec<_> = state
        .posts()
        .iter()
        .filter(|reply| reply.parent_id.as_deref() == Some(post.id.as_str()))
        .collect();

    if replies.is_empty() {
        println!("No replies yet.");
    } else {
        println!("\nReplies:");
        for reply in &replies {
            let name = state
                .user(&reply.author_id)
                .map(|user| format!("{} (@{})", user.name, user.username))
                .unwrap_or_else(|| reply.author_id.clone());
            println!("- {}: {}", name, reply.content);
        }
    }

    for signal in state.signals().iter().rev() {
        println!("\n[{:?}] {}", signal.kind, signal.message);
    }

    let notifications = state.notifications(NotificationFilter::All);
    if !notifications.is_empty() {
        println!("\nNotifications ({} unread):", state.unread_count());
        for notification in notifications {
            println!(
                "- {} {} {}",
                notification.kind.label(),
                notification.actor_id,
                notification.message
            );
        }
    }

    Ok(())
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing post text: pass --text or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
