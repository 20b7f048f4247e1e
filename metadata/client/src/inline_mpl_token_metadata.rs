//! Inlined MPL metadata types to avoid a direct dependency on
//! `mpl-token-metadata`. Only the legacy create/update instructions and the
//! fields of the metadata account that precede the variable-length tail are
//! mirrored here.

solana_sdk::declare_id!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

pub mod instruction {
    use {
        super::state::DataV2,
        borsh::{BorshDeserialize, BorshSerialize},
        solana_sdk::{
            instruction::{AccountMeta, Instruction},
            pubkey::Pubkey,
            system_program,
        },
        std::io,
    };

    const CREATE_METADATA_ACCOUNT_V3: u8 = 33;
    const UPDATE_METADATA_ACCOUNT_V2: u8 = 15;

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub enum CollectionDetails {
        V1 { size: u64 },
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct CreateMetadataAccountArgsV3 {
        pub data: DataV2,
        pub is_mutable: bool,
        pub collection_details: Option<CollectionDetails>,
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct UpdateMetadataAccountArgsV2 {
        pub data: Option<DataV2>,
        pub update_authority: Option<Pubkey>,
        pub primary_sale_happened: Option<bool>,
        pub is_mutable: Option<bool>,
    }

    /// `CreateMetadataAccountV3`; the mint authority, payer and update
    /// authority all sign.
    #[allow(clippy::too_many_arguments)]
    pub fn create_metadata_accounts_v3(
        program_id: Pubkey,
        metadata_account: Pubkey,
        mint: Pubkey,
        mint_authority: Pubkey,
        payer: Pubkey,
        update_authority: Pubkey,
        data: DataV2,
        is_mutable: bool,
    ) -> io::Result<Instruction> {
        let mut instruction_data = vec![CREATE_METADATA_ACCOUNT_V3];
        instruction_data.append(&mut borsh::to_vec(&CreateMetadataAccountArgsV3 {
            data,
            is_mutable,
            collection_details: None,
        })?);
        Ok(Instruction {
            program_id,
            accounts: vec![
                AccountMeta::new(metadata_account, false),
                AccountMeta::new_readonly(mint, false),
                AccountMeta::new_readonly(mint_authority, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(update_authority, true),
                AccountMeta::new_readonly(system_program::id(), false),
            ],
            data: instruction_data,
        })
    }

    /// `UpdateMetadataAccountV2`; every `None` leaves the stored field as is.
    pub fn update_metadata_accounts_v2(
        program_id: Pubkey,
        metadata_account: Pubkey,
        update_authority: Pubkey,
        new_update_authority: Option<Pubkey>,
        metadata: Option<DataV2>,
        primary_sale_happened: Option<bool>,
        is_mutable: Option<bool>,
    ) -> io::Result<Instruction> {
        let mut instruction_data = vec![UPDATE_METADATA_ACCOUNT_V2];
        instruction_data.append(&mut borsh::to_vec(&UpdateMetadataAccountArgsV2 {
            data: metadata,
            update_authority: new_update_authority,
            primary_sale_happened,
            is_mutable,
        })?);
        Ok(Instruction {
            program_id,
            accounts: vec![
                AccountMeta::new(metadata_account, false),
                AccountMeta::new_readonly(update_authority, true),
            ],
            data: instruction_data,
        })
    }
}

/// PDA creation helpers
pub mod pda {
    use {super::ID, solana_sdk::pubkey::Pubkey};
    const PREFIX: &str = "metadata";
    /// Helper to find a metadata account address
    pub fn find_metadata_account(mint: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[PREFIX.as_bytes(), ID.as_ref(), mint.as_ref()], &ID)
    }
}

pub mod state {
    use {
        borsh::{BorshDeserialize, BorshSerialize},
        solana_sdk::pubkey::Pubkey,
    };

    /// Account discriminator of an initialized metadata account
    pub const METADATA_V1_KEY: u8 = 4;

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct Creator {
        pub address: Pubkey,
        pub verified: bool,
        pub share: u8,
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct Collection {
        pub verified: bool,
        pub key: Pubkey,
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, PartialEq)]
    pub enum UseMethod {
        Burn,
        Multiple,
        Single,
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct Uses {
        pub use_method: UseMethod,
        pub remaining: u64,
        pub total: u64,
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct Data {
        pub name: String,
        pub symbol: String,
        pub uri: String,
        pub seller_fee_basis_points: u16,
        pub creators: Option<Vec<Creator>>,
    }

    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct DataV2 {
        pub name: String,
        pub symbol: String,
        pub uri: String,
        pub seller_fee_basis_points: u16,
        pub creators: Option<Vec<Creator>>,
        pub collection: Option<Collection>,
        pub uses: Option<Uses>,
    }

    /// Leading fields of a metadata account. The program pads name, symbol
    /// and uri with NUL bytes up to their maximum lengths.
    #[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
    pub struct Metadata {
        pub key: u8,
        pub update_authority: Pubkey,
        pub mint: Pubkey,
        pub data: Data,
        pub primary_sale_happened: bool,
        pub is_mutable: bool,
    }

    impl Metadata {
        /// Strip the NUL padding written by the program.
        pub fn trim_padding(mut self) -> Self {
            for field in [
                &mut self.data.name,
                &mut self.data.symbol,
                &mut self.data.uri,
            ] {
                let trimmed_len = field.trim_end_matches('\0').len();
                field.truncate(trimmed_len);
            }
            self
        }
    }
}
