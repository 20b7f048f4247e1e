//! Payer identity bootstrap.

use {
    crate::Error,
    log::{info, warn},
    solana_rpc_client::nonblocking::rpc_client::RpcClient,
    solana_sdk::{
        native_token::{lamports_to_sol, LAMPORTS_PER_SOL},
        pubkey::Pubkey,
        signature::{read_keypair_file, write_keypair_file, Keypair, Signer},
    },
    std::path::Path,
};

/// Environment variable holding the payer secret key as a JSON byte array.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Balance below which an airdrop is requested.
pub const MINIMUM_BALANCE: u64 = LAMPORTS_PER_SOL;

pub fn keypair_from_json(json: &str) -> Result<Keypair, Error> {
    let bytes: Vec<u8> = serde_json::from_str(json)?;
    Keypair::from_bytes(&bytes).map_err(|err| format!("invalid secret key: {}", err).into())
}

/// Use `private_key` when given, otherwise the keypair stored at
/// `keypair_path`. A missing file is replaced by a freshly generated keypair.
pub fn load_or_create_keypair(
    private_key: Option<&str>,
    keypair_path: &Path,
) -> Result<Keypair, Error> {
    if let Some(private_key) = private_key {
        return keypair_from_json(private_key);
    }

    if keypair_path.exists() {
        return read_keypair_file(keypair_path).map_err(|err| {
            format!(
                "failed to read keypair file {}: {}",
                keypair_path.display(),
                err
            )
            .into()
        });
    }

    let keypair = Keypair::new();
    write_keypair_file(&keypair, keypair_path).map_err(|err| {
        format!(
            "failed to write keypair file {}: {}",
            keypair_path.display(),
            err
        )
    })?;
    info!(
        "Generated new keypair {} at {}",
        keypair.pubkey(),
        keypair_path.display()
    );
    Ok(keypair)
}

/// Request a 1 SOL airdrop when the balance is below [`MINIMUM_BALANCE`] and
/// wait for it to land.
pub async fn airdrop_if_needed(rpc_client: &RpcClient, pubkey: &Pubkey) -> Result<u64, Error> {
    let balance = rpc_client.get_balance(pubkey).await?;
    info!("Current balance is {} SOL", lamports_to_sol(balance));
    if balance >= MINIMUM_BALANCE {
        return Ok(balance);
    }

    info!("Airdropping 1 SOL to {}", pubkey);
    let signature = rpc_client.request_airdrop(pubkey, LAMPORTS_PER_SOL).await?;
    rpc_client
        .poll_for_signature_with_commitment(&signature, rpc_client.commitment())
        .await?;

    let balance = rpc_client.get_balance(pubkey).await?;
    if balance < MINIMUM_BALANCE {
        warn!(
            "Balance is still {} SOL after airdrop; transactions may fail",
            lamports_to_sol(balance)
        );
    } else {
        info!("New balance is {} SOL", lamports_to_sol(balance));
    }
    Ok(balance)
}
