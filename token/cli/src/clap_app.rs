use {
    clap::{crate_description, crate_name, crate_version, App, Arg},
    solana_clap_utils::input_validators::{is_parsable, is_pubkey, is_url, is_url_or_moniker},
};

pub const DEFAULT_RECEIVER: &str = "cPCtdiH74Diga568rAHy7BQbBmhgCKC3KP9AML4sxcv";
pub const DEFAULT_IMAGE_PATH: &str = "assets/symbol-logo.png";
pub const DEFAULT_STORAGE_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_GATEWAY_URL: &str = "https://ipfs.io";

pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use"),
        )
        .arg(
            Arg::with_name("json_rpc_url")
                .short("u")
                .long("url")
                .value_name("URL_OR_MONIKER")
                .takes_value(true)
                .validator(is_url_or_moniker)
                .help(
                    "URL for Solana's JSON RPC or moniker (or their first letter): \
                       [mainnet-beta, testnet, devnet, localhost] \
                    Default from the configuration file.",
                ),
        )
        .arg(
            Arg::with_name("keypair")
                .short("k")
                .long("keypair")
                .value_name("KEYPAIR")
                .takes_value(true)
                .help(
                    "Filepath of the payer keypair, created if missing. \
                    Ignored when PRIVATE_KEY is set. Default from the configuration file.",
                ),
        )
        .arg(
            Arg::with_name("rpc_timeout")
                .long("rpc-timeout")
                .value_name("SECONDS")
                .takes_value(true)
                .default_value("30")
                .validator(is_parsable::<u64>)
                .help("Timeout value for RPC requests"),
        )
        .arg(
            Arg::with_name("no_airdrop")
                .long("no-airdrop")
                .takes_value(false)
                .help("Do not request an airdrop when the payer balance is below 1 SOL"),
        )
        .arg(
            Arg::with_name("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .takes_value(true)
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .default_value("info")
                .help("Log verbosity level"),
        )
        .arg(
            Arg::with_name("decimals")
                .long("decimals")
                .value_name("DECIMALS")
                .takes_value(true)
                .default_value("2")
                .validator(is_parsable::<u8>)
                .help("Number of base 10 digits to the right of the decimal place"),
        )
        .arg(
            Arg::with_name("mint_amount")
                .long("mint-amount")
                .value_name("TOKEN_AMOUNT")
                .takes_value(true)
                .default_value("100")
                .validator(is_parsable::<u64>)
                .help("Whole tokens to mint into the payer's token account"),
        )
        .arg(
            Arg::with_name("transfer_amount")
                .long("transfer-amount")
                .value_name("TOKEN_AMOUNT")
                .takes_value(true)
                .default_value("50")
                .validator(is_parsable::<u64>)
                .help("Whole tokens to transfer to the receiver"),
        )
        .arg(
            Arg::with_name("burn_amount")
                .long("burn-amount")
                .value_name("TOKEN_AMOUNT")
                .takes_value(true)
                .default_value("25")
                .validator(is_parsable::<u64>)
                .help("Whole tokens to burn from the payer's token account"),
        )
        .arg(
            Arg::with_name("receiver")
                .long("receiver")
                .value_name("RECEIVER_WALLET_ADDRESS")
                .takes_value(true)
                .default_value(DEFAULT_RECEIVER)
                .validator(is_pubkey)
                .help("Wallet that receives the transferred tokens"),
        )
        .arg(
            Arg::with_name("skip_metadata")
                .long("skip-metadata")
                .takes_value(false)
                .help("Do not upload or attach token metadata"),
        )
        .arg(
            Arg::with_name("metadata_mint")
                .long("metadata-mint")
                .value_name("TOKEN_MINT_ADDRESS")
                .takes_value(true)
                .validator(is_pubkey)
                .conflicts_with("skip_metadata")
                .help(
                    "Existing mint to attach metadata to; the payer must be its mint authority. \
                    Defaults to the mint created by this run.",
                ),
        )
        .arg(
            Arg::with_name("token_name")
                .long("token-name")
                .value_name("NAME")
                .takes_value(true)
                .default_value("Symbol")
                .help("Token name written to the metadata record"),
        )
        .arg(
            Arg::with_name("token_symbol")
                .long("token-symbol")
                .value_name("SYMBOL")
                .takes_value(true)
                .default_value("SBL")
                .help("Token symbol written to the metadata record"),
        )
        .arg(
            Arg::with_name("token_description")
                .long("token-description")
                .value_name("DESCRIPTION")
                .takes_value(true)
                .default_value("Chase signal among noise.")
                .help("Description written to the off-chain descriptor"),
        )
        .arg(
            Arg::with_name("image")
                .long("image")
                .value_name("PATH")
                .takes_value(true)
                .default_value(DEFAULT_IMAGE_PATH)
                .help("Token image to upload"),
        )
        .arg(
            Arg::with_name("storage_url")
                .long("storage-url")
                .value_name("URL")
                .takes_value(true)
                .default_value(DEFAULT_STORAGE_URL)
                .validator(is_url)
                .help("Kubo RPC API of the IPFS node that stores uploads"),
        )
        .arg(
            Arg::with_name("gateway_url")
                .long("gateway-url")
                .value_name("URL")
                .takes_value(true)
                .default_value(DEFAULT_GATEWAY_URL)
                .validator(is_url)
                .help("IPFS gateway that serves uploaded content"),
        )
        .arg(
            Arg::with_name("storage_timeout")
                .long("storage-timeout")
                .value_name("SECONDS")
                .takes_value(true)
                .default_value("60")
                .validator(is_parsable::<u64>)
                .help("Timeout value for storage uploads"),
        )
}
