use {
    crate::{
        config::{Config, MetadataStep, WalkthroughParams},
        output::WalkthroughOutput,
        Error,
    },
    log::info,
    solana_sdk::{
        native_token::lamports_to_sol,
        pubkey::Pubkey,
        signature::{Keypair, Signature, Signer},
    },
    spl_token_walkthrough_client::{
        amount::base_units_to_ui_string, client::SendTransaction, token::Token,
    },
    spl_token_walkthrough_metadata::{
        metadata::{AttachedMetadata, MetadataClient},
        storage::{StorageDriver, StorageFile},
    },
    std::sync::Arc,
};

/// Create a new mint with the payer as both mint and freeze authority.
pub async fn command_create_mint<T>(config: &Config<T>, decimals: u8) -> Result<Token<T>, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let mint_account = Keypair::new();
    let authority = config.payer.pubkey();

    let token = Token::create_mint(
        Arc::clone(&config.program_client),
        &config.program_id,
        Arc::clone(&config.payer),
        &mint_account,
        &authority,
        Some(&authority),
        decimals,
    )
    .await?;

    println!("The token mint account address: {}", token.get_address());
    println!(
        "Token Mint: {}",
        config.explorer.address_url(token.get_address())
    );
    Ok(token)
}

pub async fn command_create_token_account<T>(
    config: &Config<T>,
    token: &Token<T>,
    owner: &Pubkey,
) -> Result<Pubkey, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let account = token.get_or_create_associated_token_account(owner).await?;
    println!("Token Account: {}", config.explorer.address_url(&account));
    Ok(account)
}

pub async fn command_mint<T>(
    config: &Config<T>,
    token: &Token<T>,
    destination: &Pubkey,
    ui_amount: u64,
) -> Result<Signature, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let (amount, decimals) = token.ui_amount_to_base_units(ui_amount).await?;
    info!(
        "Minting {} tokens to {}",
        base_units_to_ui_string(amount, decimals),
        destination
    );
    let signature = token
        .mint_to(destination, &config.payer, amount, decimals)
        .await?;
    println!(
        "Mint Token Transaction: {}",
        config.explorer.transaction_url(&signature)
    );
    Ok(signature)
}

/// Upload the image and descriptor, then create the metadata record for
/// `mint`. The payer signs as mint authority and update authority.
pub async fn command_attach_metadata<T>(
    config: &Config<T>,
    storage: &dyn StorageDriver,
    mint: &Pubkey,
    step: &MetadataStep,
) -> Result<AttachedMetadata<Signature>, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let image = StorageFile::from_path(&step.image_path)?;
    let metadata_client = MetadataClient::new(
        Arc::clone(&config.program_client),
        Arc::clone(&config.payer),
    );

    let attached = metadata_client
        .attach(storage, mint, &config.payer, &step.params, &image)
        .await?;
    println!("Image uri: {}", attached.image_uri);
    println!("Metadata uri: {}", attached.descriptor_uri);
    println!(
        "Create Metadata Account: {}",
        config.explorer.transaction_url(&attached.output)
    );
    Ok(attached)
}

pub async fn command_transfer<T>(
    config: &Config<T>,
    token: &Token<T>,
    source: &Pubkey,
    destination: &Pubkey,
    ui_amount: u64,
) -> Result<Signature, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let (amount, decimals) = token.ui_amount_to_base_units(ui_amount).await?;
    info!(
        "Transferring {} tokens from {} to {}",
        base_units_to_ui_string(amount, decimals),
        source,
        destination
    );
    let signature = token
        .transfer(source, destination, &config.payer, amount, decimals)
        .await?;
    println!(
        "Transfer Transaction: {}",
        config.explorer.transaction_url(&signature)
    );
    Ok(signature)
}

pub async fn command_burn<T>(
    config: &Config<T>,
    token: &Token<T>,
    account: &Pubkey,
    ui_amount: u64,
) -> Result<Signature, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let (amount, decimals) = token.ui_amount_to_base_units(ui_amount).await?;
    info!(
        "Burning {} tokens from {}",
        base_units_to_ui_string(amount, decimals),
        account
    );
    let signature = token.burn(account, &config.payer, amount, decimals).await?;
    println!(
        "Burn Transaction: {}",
        config.explorer.transaction_url(&signature)
    );
    Ok(signature)
}

/// Run every step in order, stopping at the first failure.
///
/// `storage` is only consulted when `params.metadata` is set.
pub async fn process_walkthrough<T>(
    config: &Config<T>,
    params: &WalkthroughParams,
    storage: Option<&dyn StorageDriver>,
) -> Result<WalkthroughOutput, Error>
where
    T: SendTransaction<Output = Signature>,
{
    let owner = config.payer.pubkey();

    let token = command_create_mint(config, params.decimals).await?;
    let token_account = command_create_token_account(config, &token, &owner).await?;
    let mint_signature = command_mint(config, &token, &token_account, params.mint_amount).await?;

    let metadata_signature = match &params.metadata {
        Some(step) => {
            let storage = storage.ok_or("a storage driver is required to attach metadata")?;
            let mint = step.mint.unwrap_or(*token.get_address());
            let attached = command_attach_metadata(config, storage, &mint, step).await?;
            Some(attached.output)
        }
        None => {
            info!("Skipping metadata");
            None
        }
    };

    let receiver_token_account =
        command_create_token_account(config, &token, &params.receiver).await?;
    let transfer_signature = command_transfer(
        config,
        &token,
        &token_account,
        &receiver_token_account,
        params.transfer_amount,
    )
    .await?;
    let burn_signature = command_burn(config, &token, &token_account, params.burn_amount).await?;

    let payer_balance = config
        .program_client
        .get_balance(owner)
        .await
        .map_err(|err| err as Error)?;
    info!("Payer balance is {} SOL", lamports_to_sol(payer_balance));

    Ok(WalkthroughOutput {
        mint: *token.get_address(),
        token_account,
        receiver_token_account,
        mint_signature,
        metadata_signature,
        transfer_signature,
        burn_signature,
        payer_balance,
    })
}
