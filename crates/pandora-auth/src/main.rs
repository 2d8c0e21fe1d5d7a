//! CLI entry point for inspecting and seeding the Pandora user store.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use pandora_auth::{AuthUserStore, UserStore};
use pandora_core::{PandoraConfig, UserData};

#[derive(Parser)]
#[command(name = "pandora-users")]
#[command(about = "Look up and create users in the Pandora graph")]
struct Cli {
    /// Config file prefix (default: pandora).
    #[arg(short, long, default_value = "pandora", global = true)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a username (email, login or phone) and password.
    Login {
        #[arg(short, long)]
        username: String,

        /// Password; read from PANDORA_PASSWORD when omitted.
        #[arg(short, long, env = "PANDORA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Find a user by email.
    FindEmail { email: String },

    /// Find a user by uid.
    FindId { id: String },

    /// Create a user and print it as stored.
    Create(CreateArgs),
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    email: String,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long, default_value = "")]
    avatar: String,

    #[arg(long, default_value = "")]
    location: String,
}

impl From<CreateArgs> for UserData {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            first_name: args.first_name,
            last_name: args.last_name,
            nickname: String::new(),
            email: args.email,
            avatar: args.avatar,
            location: args.location,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = PandoraConfig::load(&cli.config)?;
    let store = UserStore::from_config(&config)?;

    let user = match cli.command {
        Command::Login { username, password } => {
            store.validate_credentials(&username, &password).await?
        }
        Command::FindEmail { email } => store.find_user_by_email(&email).await?,
        Command::FindId { id } => store.find_user_by_id(&id).await?,
        Command::Create(args) => store.create_user(&UserData::from(args)).await?,
    };
    store.close();

    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}
