pub mod descriptor;
pub mod error;
pub mod inline_mpl_token_metadata;
pub mod metadata;
pub mod storage;
