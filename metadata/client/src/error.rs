use {
    crate::storage::StorageError, solana_sdk::pubkey::Pubkey,
    spl_token_walkthrough_client::client::ProgramClientError, std::io, thiserror::Error,
};

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("client error: {0}")]
    Client(ProgramClientError),
    #[error("serialization error: {0}")]
    Serialization(#[from] io::Error),
    #[error("metadata account {0} already exists")]
    AlreadyExists(Pubkey),
    #[error("account not found")]
    AccountNotFound,
    #[error("invalid account owner")]
    AccountInvalidOwner,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),
}

pub type MetadataResult<T> = Result<T, MetadataError>;
