use {
    crate::{
        amount::ui_amount_to_base_units,
        client::{ProgramClient, ProgramClientError, SendTransaction},
    },
    log::debug,
    solana_sdk::{
        account::Account as BaseAccount,
        instruction::Instruction,
        program_error::ProgramError,
        program_pack::Pack,
        pubkey::Pubkey,
        signer::{signers::Signers, Signer},
        system_instruction,
        transaction::Transaction,
    },
    spl_associated_token_account_client::{
        address::get_associated_token_address_with_program_id,
        instruction::create_associated_token_account_idempotent,
    },
    spl_token::{
        instruction,
        state::{Account, Mint},
    },
    std::{fmt, sync::Arc},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("client error: {0}")]
    Client(ProgramClientError),
    #[error("program error: {0}")]
    Program(#[from] ProgramError),
    #[error("account not found")]
    AccountNotFound,
    #[error("invalid account owner")]
    AccountInvalidOwner,
    #[error("invalid account mint")]
    AccountInvalidMint,
    #[error("amount {ui_amount} with {decimals} decimals does not fit in base units")]
    AmountOverflow { ui_amount: u64, decimals: u8 },
}
impl PartialEq for TokenError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Client(ref a), Self::Client(ref b)) => a.to_string() == b.to_string(),
            (Self::Program(ref a), Self::Program(ref b)) => a == b,
            (Self::AccountNotFound, Self::AccountNotFound) => true,
            (Self::AccountInvalidOwner, Self::AccountInvalidOwner) => true,
            (Self::AccountInvalidMint, Self::AccountInvalidMint) => true,
            (
                Self::AmountOverflow {
                    ui_amount: a,
                    decimals: da,
                },
                Self::AmountOverflow {
                    ui_amount: b,
                    decimals: db,
                },
            ) => a == b && da == db,
            _ => false,
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;

/// Handle on a single mint, bound to a transport and a fee payer.
pub struct Token<T> {
    client: Arc<dyn ProgramClient<T>>,
    pubkey: Pubkey,
    payer: Arc<dyn Signer>,
    program_id: Pubkey,
}

impl<T> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("pubkey", &self.pubkey)
            .field("payer", &self.payer.pubkey())
            .field("program_id", &self.program_id)
            .finish()
    }
}

impl<T> Token<T>
where
    T: SendTransaction,
{
    pub fn new(
        client: Arc<dyn ProgramClient<T>>,
        program_id: &Pubkey,
        address: &Pubkey,
        payer: Arc<dyn Signer>,
    ) -> Self {
        Token {
            client,
            pubkey: *address,
            payer,
            program_id: *program_id,
        }
    }

    /// Get token address.
    pub fn get_address(&self) -> &Pubkey {
        &self.pubkey
    }

    pub async fn process_ixs<S: Signers>(
        &self,
        instructions: &[Instruction],
        signing_keypairs: &S,
    ) -> TokenResult<T::Output> {
        let latest_blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(TokenError::Client)?;

        let mut tx = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        tx.try_partial_sign(&[&self.payer], latest_blockhash)
            .map_err(|error| TokenError::Client(error.into()))?;
        tx.try_sign(signing_keypairs, latest_blockhash)
            .map_err(|error| TokenError::Client(error.into()))?;
        debug!(
            "Submitting {} instruction(s) for mint {}",
            instructions.len(),
            self.pubkey
        );

        self.client
            .send_transaction(&tx)
            .await
            .map_err(TokenError::Client)
    }

    /// Create and initialize a token.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_mint<'a, S: Signer>(
        client: Arc<dyn ProgramClient<T>>,
        program_id: &'a Pubkey,
        payer: Arc<dyn Signer>,
        mint_account: &'a S,
        mint_authority: &'a Pubkey,
        freeze_authority: Option<&'a Pubkey>,
        decimals: u8,
    ) -> TokenResult<Self> {
        let mint_pubkey = mint_account.pubkey();
        let token = Self::new(client, program_id, &mint_pubkey, payer);
        let instructions = vec![
            system_instruction::create_account(
                &token.payer.pubkey(),
                &mint_pubkey,
                token
                    .client
                    .get_minimum_balance_for_rent_exemption(Mint::LEN)
                    .await
                    .map_err(TokenError::Client)?,
                Mint::LEN as u64,
                program_id,
            ),
            instruction::initialize_mint(
                program_id,
                &mint_pubkey,
                mint_authority,
                freeze_authority,
                decimals,
            )?,
        ];
        token.process_ixs(&instructions, &[mint_account]).await?;

        Ok(token)
    }

    /// Get the address for the associated token account.
    pub fn get_associated_token_address(&self, owner: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(owner, &self.pubkey, &self.program_id)
    }

    /// Create the associated account, succeeding if it already exists.
    pub async fn create_associated_token_account(&self, owner: &Pubkey) -> TokenResult<Pubkey> {
        self.process_ixs::<[&dyn Signer; 0]>(
            &[create_associated_token_account_idempotent(
                &self.payer.pubkey(),
                owner,
                &self.pubkey,
                &self.program_id,
            )],
            &[],
        )
        .await
        .map(|_| self.get_associated_token_address(owner))
    }

    /// Retrieve the associated account address, creating the account if not
    /// found.
    pub async fn get_or_create_associated_token_account(
        &self,
        owner: &Pubkey,
    ) -> TokenResult<Pubkey> {
        let account = self.get_associated_token_address(owner);
        match self.get_account_info(&account).await {
            Ok(_) => Ok(account),
            // AccountInvalidOwner is possible if account already received some lamports.
            Err(TokenError::AccountNotFound) | Err(TokenError::AccountInvalidOwner) => {
                self.create_associated_token_account(owner).await
            }
            Err(error) => Err(error),
        }
    }

    /// Retrieve a raw account
    pub async fn get_account(&self, account: &Pubkey) -> TokenResult<BaseAccount> {
        self.client
            .get_account(*account)
            .await
            .map_err(TokenError::Client)?
            .ok_or(TokenError::AccountNotFound)
    }

    /// Retrive mint information.
    pub async fn get_mint_info(&self) -> TokenResult<Mint> {
        let account = self.get_account(&self.pubkey).await?;
        if account.owner != self.program_id {
            return Err(TokenError::AccountInvalidOwner);
        }

        Mint::unpack(&account.data).map_err(Into::into)
    }

    /// Retrieve account information.
    pub async fn get_account_info(&self, account: &Pubkey) -> TokenResult<Account> {
        let account = self.get_account(account).await?;
        if account.owner != self.program_id {
            return Err(TokenError::AccountInvalidOwner);
        }
        let account = Account::unpack(&account.data)?;
        if account.mint != *self.get_address() {
            return Err(TokenError::AccountInvalidMint);
        }

        Ok(account)
    }

    /// Read the mint's current decimals and convert a whole-token amount into
    /// base units. Returns `(base_units, decimals)`.
    pub async fn ui_amount_to_base_units(&self, ui_amount: u64) -> TokenResult<(u64, u8)> {
        let decimals = self.get_mint_info().await?.decimals;
        let amount = ui_amount_to_base_units(ui_amount, decimals)
            .ok_or(TokenError::AmountOverflow {
                ui_amount,
                decimals,
            })?;
        Ok((amount, decimals))
    }

    /// Mint new tokens
    pub async fn mint_to<S: Signer>(
        &self,
        destination: &Pubkey,
        authority: &S,
        amount: u64,
        decimals: u8,
    ) -> TokenResult<T::Output> {
        self.process_ixs(
            &[instruction::mint_to_checked(
                &self.program_id,
                &self.pubkey,
                destination,
                &authority.pubkey(),
                &[],
                amount,
                decimals,
            )?],
            &[authority],
        )
        .await
    }

    /// Mint a whole-token amount, scaled by the mint's on-chain decimals
    pub async fn mint_to_ui_amount<S: Signer>(
        &self,
        destination: &Pubkey,
        authority: &S,
        ui_amount: u64,
    ) -> TokenResult<T::Output> {
        let (amount, decimals) = self.ui_amount_to_base_units(ui_amount).await?;
        self.mint_to(destination, authority, amount, decimals).await
    }

    /// Transfer tokens to another account
    pub async fn transfer<S: Signer>(
        &self,
        source: &Pubkey,
        destination: &Pubkey,
        authority: &S,
        amount: u64,
        decimals: u8,
    ) -> TokenResult<T::Output> {
        self.process_ixs(
            &[instruction::transfer_checked(
                &self.program_id,
                source,
                &self.pubkey,
                destination,
                &authority.pubkey(),
                &[],
                amount,
                decimals,
            )?],
            &[authority],
        )
        .await
    }

    /// Transfer a whole-token amount, scaled by the mint's on-chain decimals
    pub async fn transfer_ui_amount<S: Signer>(
        &self,
        source: &Pubkey,
        destination: &Pubkey,
        authority: &S,
        ui_amount: u64,
    ) -> TokenResult<T::Output> {
        let (amount, decimals) = self.ui_amount_to_base_units(ui_amount).await?;
        self.transfer(source, destination, authority, amount, decimals)
            .await
    }

    /// Burn tokens from account
    pub async fn burn<S: Signer>(
        &self,
        account: &Pubkey,
        authority: &S,
        amount: u64,
        decimals: u8,
    ) -> TokenResult<T::Output> {
        self.process_ixs(
            &[instruction::burn_checked(
                &self.program_id,
                account,
                &self.pubkey,
                &authority.pubkey(),
                &[],
                amount,
                decimals,
            )?],
            &[authority],
        )
        .await
    }

    /// Burn a whole-token amount, scaled by the mint's on-chain decimals
    pub async fn burn_ui_amount<S: Signer>(
        &self,
        account: &Pubkey,
        authority: &S,
        ui_amount: u64,
    ) -> TokenResult<T::Output> {
        let (amount, decimals) = self.ui_amount_to_base_units(ui_amount).await?;
        self.burn(account, authority, amount, decimals).await
    }
}
