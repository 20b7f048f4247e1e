use {
    crate::{
        descriptor::TokenDescriptor,
        error::{MetadataError, MetadataResult},
        inline_mpl_token_metadata::{
            self,
            instruction::{create_metadata_accounts_v3, update_metadata_accounts_v2},
            pda::find_metadata_account,
            state::{DataV2, Metadata},
        },
        storage::{StorageDriver, StorageFile},
    },
    log::debug,
    solana_sdk::{
        borsh1::try_from_slice_unchecked,
        instruction::Instruction,
        pubkey::Pubkey,
        signer::{signers::Signers, Signer},
        transaction::Transaction,
    },
    spl_token_walkthrough_client::client::{ProgramClient, SendTransaction},
    std::{fmt, sync::Arc},
};

const DESCRIPTOR_FILE_NAME: &str = "metadata.json";

/// Display attributes written to the metadata record and its descriptor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMetadataParams {
    pub name: String,
    pub symbol: String,
    pub description: String,
}

impl TokenMetadataParams {
    /// On-chain data: no royalties, creators, collection or uses.
    pub fn data_v2(&self, uri: String) -> DataV2 {
        DataV2 {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            uri,
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        }
    }
}

/// Result of a completed attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachedMetadata<O> {
    pub metadata_address: Pubkey,
    pub image_uri: String,
    pub descriptor_uri: String,
    pub output: O,
}

/// Client for the token-metadata program, sharing the transport used for
/// token operations.
pub struct MetadataClient<T> {
    client: Arc<dyn ProgramClient<T>>,
    payer: Arc<dyn Signer>,
}

impl<T> fmt::Debug for MetadataClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataClient")
            .field("payer", &self.payer.pubkey())
            .finish()
    }
}

impl<T> MetadataClient<T>
where
    T: SendTransaction,
{
    pub fn new(client: Arc<dyn ProgramClient<T>>, payer: Arc<dyn Signer>) -> Self {
        Self { client, payer }
    }

    pub fn get_metadata_address(&self, mint: &Pubkey) -> Pubkey {
        find_metadata_account(mint).0
    }

    async fn process_ixs<S: Signers>(
        &self,
        instructions: &[Instruction],
        signing_keypairs: &S,
    ) -> MetadataResult<T::Output> {
        let latest_blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(MetadataError::Client)?;

        let mut tx = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        tx.try_partial_sign(&[&self.payer], latest_blockhash)
            .map_err(|error| MetadataError::Client(error.into()))?;
        tx.try_sign(signing_keypairs, latest_blockhash)
            .map_err(|error| MetadataError::Client(error.into()))?;

        self.client
            .send_transaction(&tx)
            .await
            .map_err(MetadataError::Client)
    }

    /// Read the metadata record for a mint, without the program's padding.
    pub async fn get_metadata(&self, mint: &Pubkey) -> MetadataResult<Metadata> {
        let account = self
            .client
            .get_account(self.get_metadata_address(mint))
            .await
            .map_err(MetadataError::Client)?
            .ok_or(MetadataError::AccountNotFound)?;
        if account.owner != inline_mpl_token_metadata::id() {
            return Err(MetadataError::AccountInvalidOwner);
        }

        let metadata: Metadata = try_from_slice_unchecked(&account.data)?;
        Ok(metadata.trim_padding())
    }

    /// Create the metadata record. `authority` signs as both mint authority
    /// and update authority.
    pub async fn create<S: Signer>(
        &self,
        mint: &Pubkey,
        authority: &S,
        data: DataV2,
        is_mutable: bool,
    ) -> MetadataResult<T::Output> {
        let instruction = create_metadata_accounts_v3(
            inline_mpl_token_metadata::id(),
            self.get_metadata_address(mint),
            *mint,
            authority.pubkey(),
            self.payer.pubkey(),
            authority.pubkey(),
            data,
            is_mutable,
        )?;
        self.process_ixs(&[instruction], &[authority]).await
    }

    /// Update a mutable metadata record.
    pub async fn update<S: Signer>(
        &self,
        mint: &Pubkey,
        update_authority: &S,
        data: Option<DataV2>,
        new_update_authority: Option<Pubkey>,
        primary_sale_happened: Option<bool>,
        is_mutable: Option<bool>,
    ) -> MetadataResult<T::Output> {
        let instruction = update_metadata_accounts_v2(
            inline_mpl_token_metadata::id(),
            self.get_metadata_address(mint),
            update_authority.pubkey(),
            new_update_authority,
            data,
            primary_sale_happened,
            is_mutable,
        )?;
        self.process_ixs(&[instruction], &[update_authority]).await
    }

    /// Upload the image, then a descriptor pointing at it, then write the
    /// on-chain record pointing at the descriptor.
    ///
    /// Fails with [`MetadataError::AlreadyExists`] before any upload when the
    /// mint already has a metadata record. A failure after the uploads leaves
    /// them in storage; the whole call can be repeated.
    pub async fn attach<S: Signer>(
        &self,
        storage: &dyn StorageDriver,
        mint: &Pubkey,
        authority: &S,
        params: &TokenMetadataParams,
        image: &StorageFile,
    ) -> MetadataResult<AttachedMetadata<T::Output>> {
        let metadata_address = self.get_metadata_address(mint);
        if self
            .client
            .get_account(metadata_address)
            .await
            .map_err(MetadataError::Client)?
            .is_some()
        {
            return Err(MetadataError::AlreadyExists(metadata_address));
        }

        let image_uri = storage.upload(image).await?;
        debug!("Uploaded image to {}", image_uri);

        let descriptor = TokenDescriptor {
            name: params.name.clone(),
            description: params.description.clone(),
            image: image_uri.clone(),
        };
        let descriptor_uri = storage
            .upload(&StorageFile::json(&descriptor, DESCRIPTOR_FILE_NAME)?)
            .await?;
        debug!("Uploaded descriptor to {}", descriptor_uri);

        debug!("Creating metadata account {} for {}", metadata_address, mint);
        let output = self
            .create(mint, authority, params.data_v2(descriptor_uri.clone()), true)
            .await?;

        Ok(AttachedMetadata {
            metadata_address,
            image_uri,
            descriptor_uri,
            output,
        })
    }
}
