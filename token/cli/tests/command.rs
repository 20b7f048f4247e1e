use {
    assert_matches::assert_matches,
    async_trait::async_trait,
    solana_program_test::{
        tokio::{self, sync::Mutex},
        ProgramTest,
    },
    solana_sdk::{
        account::Account,
        hash::Hash,
        pubkey::Pubkey,
        signature::{Keypair, Signature, Signer},
        system_program,
        transaction::Transaction,
    },
    spl_token_walkthrough_cli::{
        command::{command_attach_metadata, process_walkthrough},
        config::{Config, MetadataStep, WalkthroughParams},
        output::Explorer,
    },
    spl_token_walkthrough_client::{
        client::{
            ProgramBanksClient, ProgramBanksClientProcessTransaction, ProgramClient,
            ProgramClientResult, SendTransaction,
        },
        token::Token,
    },
    spl_token_walkthrough_metadata::{
        inline_mpl_token_metadata::{self, pda::find_metadata_account},
        metadata::TokenMetadataParams,
        storage::{MemoryStorage, StorageDriver},
    },
    std::{io::Write, path::PathBuf, sync::Arc},
};

async fn banks_config() -> Config<ProgramBanksClientProcessTransaction> {
    let ctx = ProgramTest::default().start_with_context().await;
    let payer = Keypair::from_bytes(&ctx.payer.to_bytes()).unwrap();
    let ctx = Arc::new(Mutex::new(ctx));
    let client: Arc<dyn ProgramClient<ProgramBanksClientProcessTransaction>> =
        Arc::new(ProgramBanksClient::new_from_context(
            ctx,
            ProgramBanksClientProcessTransaction,
        ));
    Config::new_with_client(
        client,
        Arc::new(payer),
        Explorer::from_url("http://localhost:8899"),
    )
}

fn params(decimals: u8) -> WalkthroughParams {
    WalkthroughParams {
        decimals,
        mint_amount: 100,
        transfer_amount: 50,
        burn_amount: 25,
        receiver: Pubkey::new_unique(),
        metadata: None,
    }
}

fn metadata_params() -> TokenMetadataParams {
    TokenMetadataParams {
        name: "Symbol".to_string(),
        symbol: "SBL".to_string(),
        description: "Chase signal among noise.".to_string(),
    }
}

#[tokio::test]
async fn walkthrough_without_metadata() {
    let config = banks_config().await;
    let params = params(2);
    let initial_balance = config
        .program_client
        .get_balance(config.payer.pubkey())
        .await
        .unwrap();

    let output = process_walkthrough(&config, &params, None)
        .await
        .expect("walkthrough failed");
    assert!(output.metadata_signature.is_none());
    // fees plus rent for the mint and both token accounts
    assert!(output.payer_balance < initial_balance);

    let token = Token::new(
        Arc::clone(&config.program_client),
        &config.program_id,
        &output.mint,
        Arc::clone(&config.payer),
    );
    let mint = token.get_mint_info().await.unwrap();
    assert_eq!(mint.decimals, 2);
    assert_eq!(mint.supply, 7_500);

    let source = token.get_account_info(&output.token_account).await.unwrap();
    assert_eq!(source.owner, config.payer.pubkey());
    assert_eq!(source.amount, 2_500);

    let receiver = token
        .get_account_info(&output.receiver_token_account)
        .await
        .unwrap();
    assert_eq!(receiver.owner, params.receiver);
    assert_eq!(receiver.amount, 5_000);
    assert_eq!(
        output.receiver_token_account,
        token.get_associated_token_address(&params.receiver)
    );
}

#[tokio::test]
async fn walkthrough_scales_by_decimals() {
    let config = banks_config().await;

    let output = process_walkthrough(&config, &params(0), None)
        .await
        .expect("walkthrough failed");

    let token = Token::new(
        Arc::clone(&config.program_client),
        &config.program_id,
        &output.mint,
        Arc::clone(&config.payer),
    );
    assert_eq!(token.get_mint_info().await.unwrap().supply, 75);
    assert_eq!(
        token
            .get_account_info(&output.token_account)
            .await
            .unwrap()
            .amount,
        25
    );
}

#[tokio::test]
async fn walkthrough_stops_when_burn_exceeds_balance() {
    let config = banks_config().await;
    let params = WalkthroughParams {
        burn_amount: 60,
        ..params(2)
    };

    let result = process_walkthrough(&config, &params, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn walkthrough_requires_storage_for_metadata() {
    let config = banks_config().await;
    let params = WalkthroughParams {
        metadata: Some(MetadataStep {
            mint: None,
            params: metadata_params(),
            image_path: PathBuf::from("assets/symbol-logo.png"),
        }),
        ..params(2)
    };

    let result = process_walkthrough(&config, &params, None).await;
    assert_matches!(result, Err(err) if err.to_string().contains("storage driver"));
}

#[derive(Debug, Clone, Copy, Default)]
struct RecordTransaction;

impl SendTransaction for RecordTransaction {
    type Output = Signature;
}

/// Accepts every transaction without executing it; no account exists.
#[derive(Default)]
struct RecordingClient {
    sent: Mutex<Vec<Transaction>>,
}

#[async_trait]
impl ProgramClient<RecordTransaction> for RecordingClient {
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        _data_len: usize,
    ) -> ProgramClientResult<u64> {
        Ok(0)
    }

    async fn get_latest_blockhash(&self) -> ProgramClientResult<Hash> {
        Ok(Hash::default())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ProgramClientResult<Signature> {
        self.sent.lock().await.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn get_account(&self, _address: Pubkey) -> ProgramClientResult<Option<Account>> {
        Ok(None)
    }

    async fn get_balance(&self, _address: Pubkey) -> ProgramClientResult<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn attach_metadata_reads_image_and_links_descriptor() {
    let client = Arc::new(RecordingClient::default());
    let config = Config::new_with_client(
        Arc::clone(&client) as Arc<dyn ProgramClient<RecordTransaction>>,
        Arc::new(Keypair::new()),
        Explorer::from_url("https://api.devnet.solana.com"),
    );

    let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    image.write_all(&[137, 80, 78, 71, 13, 10, 26, 10]).unwrap();
    let step = MetadataStep {
        mint: None,
        params: metadata_params(),
        image_path: image.path().to_path_buf(),
    };

    let mint = Pubkey::new_unique();
    let storage = MemoryStorage::new();
    let attached = command_attach_metadata(&config, &storage, &mint, &step)
        .await
        .expect("failed to attach metadata");

    assert_eq!(attached.metadata_address, find_metadata_account(&mint).0);
    assert_eq!(
        storage.download(&attached.image_uri).await.unwrap(),
        vec![137, 80, 78, 71, 13, 10, 26, 10]
    );
    let descriptor: serde_json::Value =
        serde_json::from_slice(&storage.download(&attached.descriptor_uri).await.unwrap())
            .unwrap();
    assert_eq!(descriptor["name"], "Symbol");
    assert_eq!(descriptor["description"], "Chase signal among noise.");
    assert_eq!(descriptor["image"], attached.image_uri.as_str());

    let sent = client.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].signatures[0], attached.output);
}

#[tokio::test]
async fn attach_metadata_missing_image_uploads_nothing() {
    let client = Arc::new(RecordingClient::default());
    let config = Config::new_with_client(
        Arc::clone(&client) as Arc<dyn ProgramClient<RecordTransaction>>,
        Arc::new(Keypair::new()),
        Explorer::from_url("https://api.devnet.solana.com"),
    );
    let step = MetadataStep {
        mint: None,
        params: metadata_params(),
        image_path: PathBuf::from("assets/does-not-exist.png"),
    };

    let storage = MemoryStorage::new();
    let result = command_attach_metadata(&config, &storage, &Pubkey::new_unique(), &step).await;
    assert!(result.is_err());
    assert!(storage.is_empty());
    assert!(client.sent.lock().await.is_empty());
}

/// Runs everything on a bank except metadata-program transactions, which
/// are recorded instead since the metadata program is not loaded. Keeps the
/// first program id of every transaction in send order.
struct MetadataInterceptClient {
    inner: ProgramBanksClient<ProgramBanksClientProcessTransaction>,
    programs: Mutex<Vec<Pubkey>>,
    metadata_transactions: Mutex<Vec<Transaction>>,
}

fn program_ids(transaction: &Transaction) -> Vec<Pubkey> {
    let message = &transaction.message;
    message
        .instructions
        .iter()
        .map(|ix| message.account_keys[ix.program_id_index as usize])
        .collect()
}

#[async_trait]
impl ProgramClient<ProgramBanksClientProcessTransaction> for MetadataInterceptClient {
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> ProgramClientResult<u64> {
        self.inner
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
    }

    async fn get_latest_blockhash(&self) -> ProgramClientResult<Hash> {
        self.inner.get_latest_blockhash().await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ProgramClientResult<Signature> {
        let ids = program_ids(transaction);
        self.programs.lock().await.push(ids[0]);
        if ids.contains(&inline_mpl_token_metadata::id()) {
            self.metadata_transactions
                .lock()
                .await
                .push(transaction.clone());
            return Ok(transaction.signatures[0]);
        }
        self.inner.send_transaction(transaction).await
    }

    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>> {
        self.inner.get_account(address).await
    }

    async fn get_balance(&self, address: Pubkey) -> ProgramClientResult<u64> {
        self.inner.get_balance(address).await
    }
}

async fn intercepting_config() -> (
    Config<ProgramBanksClientProcessTransaction>,
    Arc<MetadataInterceptClient>,
) {
    let ctx = ProgramTest::default().start_with_context().await;
    let payer = Keypair::from_bytes(&ctx.payer.to_bytes()).unwrap();
    let client = Arc::new(MetadataInterceptClient {
        inner: ProgramBanksClient::new_from_context(
            Arc::new(Mutex::new(ctx)),
            ProgramBanksClientProcessTransaction,
        ),
        programs: Mutex::new(vec![]),
        metadata_transactions: Mutex::new(vec![]),
    });
    let config = Config::new_with_client(
        Arc::clone(&client) as Arc<dyn ProgramClient<ProgramBanksClientProcessTransaction>>,
        Arc::new(payer),
        Explorer::from_url("http://localhost:8899"),
    );
    (config, client)
}

async fn walkthrough_with_metadata(metadata_mint: Option<Pubkey>) {
    let (config, client) = intercepting_config().await;

    let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    image.write_all(&[137, 80, 78, 71, 13, 10, 26, 10]).unwrap();
    let params = WalkthroughParams {
        metadata: Some(MetadataStep {
            mint: metadata_mint,
            params: metadata_params(),
            image_path: image.path().to_path_buf(),
        }),
        ..params(2)
    };

    let storage = MemoryStorage::new();
    let output = process_walkthrough(&config, &params, Some(&storage as &dyn StorageDriver))
        .await
        .expect("walkthrough failed");
    // image and descriptor
    assert_eq!(storage.len(), 2);

    let target = metadata_mint.unwrap_or(output.mint);
    let recorded = client.metadata_transactions.lock().await;
    assert_eq!(recorded.len(), 1);
    let message = &recorded[0].message;
    let create = &message.instructions[0];
    assert_eq!(create.data[0], 33);
    assert_eq!(
        message.account_keys[create.accounts[0] as usize],
        find_metadata_account(&target).0
    );
    assert_eq!(message.account_keys[create.accounts[1] as usize], target);
    assert_eq!(output.metadata_signature, Some(recorded[0].signatures[0]));

    // create mint, payer account, mint-to, metadata, receiver account,
    // transfer, burn
    let programs = client.programs.lock().await;
    assert_eq!(programs.len(), 7);
    assert_eq!(programs[0], system_program::id());
    assert_eq!(programs[2], spl_token::id());
    assert_eq!(programs[3], inline_mpl_token_metadata::id());
    assert_eq!(programs[4], programs[1]);
    assert_eq!(programs[5], spl_token::id());
    assert_eq!(programs[6], spl_token::id());

    let token = Token::new(
        Arc::clone(&config.program_client),
        &config.program_id,
        &output.mint,
        Arc::clone(&config.payer),
    );
    assert_eq!(token.get_mint_info().await.unwrap().supply, 7_500);
    assert_eq!(
        token
            .get_account_info(&output.token_account)
            .await
            .unwrap()
            .amount,
        2_500
    );
    assert_eq!(
        token
            .get_account_info(&output.receiver_token_account)
            .await
            .unwrap()
            .amount,
        5_000
    );
}

#[tokio::test]
async fn walkthrough_attaches_metadata_to_new_mint() {
    walkthrough_with_metadata(None).await;
}

#[tokio::test]
async fn walkthrough_attaches_metadata_to_override_mint() {
    walkthrough_with_metadata(Some(Pubkey::new_unique())).await;
}
