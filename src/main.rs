use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use outreach::cli::{
    handle_audit_command, handle_decode_command, handle_normalize_command, handle_seal_command,
    handle_total_command, prompt_secret, AuditArgs, DecodeArgs, NormalizeArgs, SealArgs,
    TotalArgs,
};
use outreach::config::{resolve_secret, OutreachPaths, Settings, SECRET_ENV_VAR};
use outreach::engine::Engine;

#[derive(Parser)]
#[command(
    name = "outreach",
    version,
    about = "Decode encrypted outreach records payloads and summarize audit trails",
    long_about = "Decodes the IV:ciphertext envelopes the outreach records backend \
                  returns, normalizes individually encrypted fields and turns audit \
                  rows into one-line summaries."
)]
struct Cli {
    /// Shared secret (16, 24 or 32 bytes)
    #[arg(long, global = true, env = SECRET_ENV_VAR, hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an envelope and print its JSON value
    Decode(DecodeArgs),

    /// Encrypt a value into an envelope
    Seal(SealArgs),

    /// Decode a saved response and its encrypted record fields
    Normalize(NormalizeArgs),

    /// Summarize an audit trail export
    Audit(AuditArgs),

    /// Resolve the display total of a saved list response
    Total(TotalArgs),

    /// Write default settings
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // init and config must work with a broken settings file
    let paths = OutreachPaths::new()?;

    let Some(command) = cli.command else {
        println!("outreach - encrypted payload decoding and audit summaries");
        println!();
        println!("Run 'outreach --help' for usage information.");
        return Ok(());
    };

    match command {
        Commands::Init { force } => {
            if paths.is_initialized() && !force {
                println!("Already initialized at: {}", paths.settings_file().display());
                println!("Use 'outreach init --force' to reset it to defaults.");
                return Ok(());
            }
            Settings::default().save(&paths)?;
            println!("Settings written to: {}", paths.settings_file().display());
            println!();
            println!("Set {} or pass --secret to decode payloads.", SECRET_ENV_VAR);
        }
        Commands::Config => {
            println!("Outreach Records Configuration");
            println!("==============================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();

            let settings = match Settings::load_or_create(&paths) {
                Ok(settings) => settings,
                Err(e) => {
                    println!("Could not load settings: {}", e);
                    println!("Run 'outreach init --force' to reset them to defaults.");
                    return Ok(());
                }
            };

            println!("Settings:");
            println!(
                "  Shared secret:    {}",
                if cli.secret.is_some() {
                    "from environment/flag"
                } else if settings.shared_secret.is_some() {
                    "from settings file"
                } else {
                    "not set"
                }
            );
            println!("  Timestamp format: {}", settings.timestamp_format);
            match settings.utc_offset_minutes {
                Some(minutes) => println!("  UTC offset:       {} minutes", minutes),
                None => println!("  UTC offset:       local time"),
            }
            println!("  Diff equality:    {:?}", settings.diff_equality);
            println!("  Encrypted fields: {}", settings.encrypted_fields.join(", "));
        }
        command => {
            let settings = Settings::load_or_create(&paths)?;
            let secret = match resolve_secret(cli.secret, &settings)? {
                Some(secret) => secret,
                None => outreach::crypto::SharedSecret::new(prompt_secret()?)?,
            };
            let engine = settings.engine(secret)?;
            run(&engine, command)?;
        }
    }

    Ok(())
}

fn run(engine: &Engine, command: Commands) -> outreach::OutreachResult<()> {
    match command {
        Commands::Decode(args) => handle_decode_command(engine, args),
        Commands::Seal(args) => handle_seal_command(engine, args),
        Commands::Normalize(args) => handle_normalize_command(engine, args),
        Commands::Audit(args) => handle_audit_command(engine, args),
        Commands::Total(args) => handle_total_command(engine, args),
        Commands::Init { .. } | Commands::Config => Ok(()),
    }
}
