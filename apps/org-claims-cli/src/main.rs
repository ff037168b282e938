use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use org_claims_sdk::{
    ClaimSet, INCLUDE_IN_ACCESS_TOKEN, INCLUDE_IN_ID_TOKEN, INCLUDE_IN_USERINFO, MULTIVALUED,
    MapperModel, MapperRegistry, ProtocolMapper, TOKEN_CLAIM_NAME, TokenKind, UserModel,
    UserSession,
};
use org_service_mapper::{CustomOrganizationMapper, OrgMapperConfig, OrganizationResolver};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::path::PathBuf;

/// Org Claims CLI - exercise the organization claim mapper from a shell
#[derive(Parser)]
#[command(name = "org-claims-cli")]
#[command(about = "Resolve organization ids and preview the claims they produce")]
#[command(version)]
struct Cli {
    /// Path to the mapper configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the organizations of a user as a JSON array
    Resolve {
        /// User id to look up
        user_id: String,
    },
    /// Print the provider metadata and configuration properties
    Describe,
    /// Run the mapper for one token and print the resulting claims
    Map {
        /// Token being issued
        #[arg(long, value_enum, default_value_t = TokenArg::Access)]
        token: TokenArg,

        /// Claim name, dots create nested objects
        #[arg(long, default_value = "organizations")]
        claim_name: String,

        /// Write only the first organization instead of the whole list
        #[arg(long)]
        single: bool,

        /// User id to look up
        user_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TokenArg {
    Access,
    Id,
    Userinfo,
}

impl From<TokenArg> for TokenKind {
    fn from(arg: TokenArg) -> Self {
        match arg {
            TokenArg::Access => TokenKind::AccessToken,
            TokenArg::Id => TokenKind::IdToken,
            TokenArg::Userinfo => TokenKind::UserInfo,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // defaults -> YAML (if provided) -> env (ORG_MAPPER__*)
    let config = OrgMapperConfig::load(cli.config.as_deref())
        .context("failed to load org mapper configuration")?;

    match cli.command {
        Commands::Resolve { user_id } => resolve(config, &user_id).await,
        Commands::Describe => describe(config),
        Commands::Map {
            token,
            claim_name,
            single,
            user_id,
        } => map(config, token.into(), &claim_name, single, user_id).await,
    }
}

/// `RUST_LOG` wins; otherwise the level follows `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn resolve(config: OrgMapperConfig, user_id: &str) -> Result<()> {
    let organizations = OrganizationResolver::new(config)
        .resolve(Some(user_id))
        .await;
    println!("{}", serde_json::to_string_pretty(&organizations)?);
    Ok(())
}

fn describe(config: OrgMapperConfig) -> Result<()> {
    let mapper = CustomOrganizationMapper::from_config(config);
    let description = serde_json::json!({
        "id": mapper.id(),
        "category": mapper.display_category(),
        "type": mapper.display_type(),
        "help": mapper.help_text(),
        "properties": mapper.config_properties(),
    });
    println!("{}", serde_json::to_string_pretty(&description)?);
    Ok(())
}

async fn map(
    config: OrgMapperConfig,
    token: TokenKind,
    claim_name: &str,
    single: bool,
    user_id: String,
) -> Result<()> {
    let mut registry = MapperRegistry::default();
    org_service_mapper::register(&mut registry, config);

    let model = MapperModel::new("organizations", org_service_mapper::PROVIDER_ID)
        .with_config(TOKEN_CLAIM_NAME, claim_name)
        .with_config(MULTIVALUED, (!single).to_string())
        .with_config(INCLUDE_IN_ACCESS_TOKEN, "true")
        .with_config(INCLUDE_IN_ID_TOKEN, "true")
        .with_config(INCLUDE_IN_USERINFO, "true");
    let session = UserSession::for_user(UserModel::new(user_id));

    let mut claims = ClaimSet::new();
    let applied = registry
        .apply(token, &mut claims, std::slice::from_ref(&model), &session)
        .await;
    tracing::info!(applied, "claim mappers applied");

    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}
