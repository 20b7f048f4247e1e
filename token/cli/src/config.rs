use {
    crate::{
        keypair::{airdrop_if_needed, load_or_create_keypair, PRIVATE_KEY_ENV},
        output::Explorer,
        Error,
    },
    clap::{value_t_or_exit, ArgMatches},
    log::info,
    solana_clap_utils::{
        input_parsers::pubkey_of,
        input_validators::normalize_to_url_if_moniker,
    },
    solana_rpc_client::nonblocking::rpc_client::RpcClient,
    solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signer},
    spl_token_walkthrough_client::client::{
        ProgramClient, ProgramRpcClient, ProgramRpcClientSendTransaction,
    },
    spl_token_walkthrough_metadata::{metadata::TokenMetadataParams, storage::IpfsStorage},
    std::{env, path::PathBuf, sync::Arc, time::Duration},
};

const DEFAULT_JSON_RPC_URL: &str = "https://api.devnet.solana.com";

/// Shared context handed to every command.
pub struct Config<T> {
    pub program_client: Arc<dyn ProgramClient<T>>,
    pub payer: Arc<dyn Signer>,
    pub program_id: Pubkey,
    pub explorer: Explorer,
}

impl Config<ProgramRpcClientSendTransaction> {
    /// Resolve the endpoint and payer, fund the payer if allowed, and connect
    /// the program client.
    pub async fn new(matches: &ArgMatches<'_>) -> Result<Self, Error> {
        let cli_config = load_cli_config(matches)?;
        let json_rpc_url = normalize_to_url_if_moniker(
            matches
                .value_of("json_rpc_url")
                .unwrap_or(&cli_config.json_rpc_url),
        );
        let rpc_timeout = Duration::from_secs(value_t_or_exit!(matches, "rpc_timeout", u64));
        let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            json_rpc_url.clone(),
            rpc_timeout,
            CommitmentConfig::confirmed(),
        ));
        info!("Using RPC endpoint {}", json_rpc_url);

        let keypair_path = PathBuf::from(
            matches
                .value_of("keypair")
                .unwrap_or(&cli_config.keypair_path),
        );
        let private_key = env::var(PRIVATE_KEY_ENV).ok();
        let payer = load_or_create_keypair(private_key.as_deref(), &keypair_path)?;
        println!("PublicKey: {}", payer.pubkey());

        if !matches.is_present("no_airdrop") {
            airdrop_if_needed(&rpc_client, &payer.pubkey()).await?;
        }

        let program_client: Arc<dyn ProgramClient<ProgramRpcClientSendTransaction>> = Arc::new(
            ProgramRpcClient::new(rpc_client, ProgramRpcClientSendTransaction),
        );
        Ok(Self::new_with_client(
            program_client,
            Arc::new(payer),
            Explorer::from_url(&json_rpc_url),
        ))
    }
}

impl<T> Config<T> {
    pub fn new_with_client(
        program_client: Arc<dyn ProgramClient<T>>,
        payer: Arc<dyn Signer>,
        explorer: Explorer,
    ) -> Self {
        Self {
            program_client,
            payer,
            program_id: spl_token::id(),
            explorer,
        }
    }
}

fn load_cli_config(matches: &ArgMatches<'_>) -> Result<solana_cli_config::Config, Error> {
    if let Some(config_file) = matches.value_of("config_file") {
        solana_cli_config::Config::load(config_file)
            .map_err(|_| format!("Could not find config file `{}`", config_file).into())
    } else {
        // without a CLI config the walkthrough targets devnet
        Ok(solana_cli_config::CONFIG_FILE
            .as_ref()
            .and_then(|config_file| solana_cli_config::Config::load(config_file).ok())
            .unwrap_or_else(|| solana_cli_config::Config {
                json_rpc_url: DEFAULT_JSON_RPC_URL.to_string(),
                ..solana_cli_config::Config::default()
            }))
    }
}

/// Metadata attachment settings; absent when metadata is skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataStep {
    /// Mint to attach to, the newly created one when `None`.
    pub mint: Option<Pubkey>,
    pub params: TokenMetadataParams,
    pub image_path: PathBuf,
}

/// Amounts and parties of one run, in whole tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkthroughParams {
    pub decimals: u8,
    pub mint_amount: u64,
    pub transfer_amount: u64,
    pub burn_amount: u64,
    pub receiver: Pubkey,
    pub metadata: Option<MetadataStep>,
}

impl WalkthroughParams {
    pub fn new(matches: &ArgMatches<'_>) -> Result<Self, Error> {
        let metadata = if matches.is_present("skip_metadata") {
            None
        } else {
            Some(MetadataStep {
                mint: pubkey_of(matches, "metadata_mint"),
                params: TokenMetadataParams {
                    name: value_t_or_exit!(matches, "token_name", String),
                    symbol: value_t_or_exit!(matches, "token_symbol", String),
                    description: value_t_or_exit!(matches, "token_description", String),
                },
                image_path: PathBuf::from(value_t_or_exit!(matches, "image", String)),
            })
        };

        Ok(Self {
            decimals: value_t_or_exit!(matches, "decimals", u8),
            mint_amount: value_t_or_exit!(matches, "mint_amount", u64),
            transfer_amount: value_t_or_exit!(matches, "transfer_amount", u64),
            burn_amount: value_t_or_exit!(matches, "burn_amount", u64),
            receiver: pubkey_of(matches, "receiver").ok_or("receiver address is required")?,
            metadata,
        })
    }
}

/// Storage client for the metadata step, `None` when metadata is skipped.
pub fn storage_from_matches(matches: &ArgMatches<'_>) -> Result<Option<IpfsStorage>, Error> {
    if matches.is_present("skip_metadata") {
        return Ok(None);
    }
    let storage_url = value_t_or_exit!(matches, "storage_url", String);
    let gateway_url = value_t_or_exit!(matches, "gateway_url", String);
    let timeout = Duration::from_secs(value_t_or_exit!(matches, "storage_timeout", u64));
    let storage = IpfsStorage::new(&storage_url, &gateway_url, timeout)?;
    info!("Uploading through IPFS node {}", storage_url);
    Ok(Some(storage))
}
