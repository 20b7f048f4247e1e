use {
    solana_sdk::{native_token::lamports_to_sol, pubkey::Pubkey, signature::Signature},
    std::fmt,
    url::form_urlencoded,
};

const EXPLORER_URL: &str = "https://explorer.solana.com";

/// Cluster an RPC endpoint belongs to, as understood by the explorer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cluster {
    MainnetBeta,
    Devnet,
    Testnet,
    Custom(String),
}

impl Cluster {
    pub fn from_url(json_rpc_url: &str) -> Self {
        if json_rpc_url.contains("devnet") {
            Cluster::Devnet
        } else if json_rpc_url.contains("testnet") {
            Cluster::Testnet
        } else if json_rpc_url.contains("mainnet") {
            Cluster::MainnetBeta
        } else {
            Cluster::Custom(json_rpc_url.to_string())
        }
    }
}

/// Builds explorer links for the cluster the walkthrough runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explorer {
    cluster: Cluster,
}

impl Explorer {
    pub fn new(cluster: Cluster) -> Self {
        Self { cluster }
    }

    pub fn from_url(json_rpc_url: &str) -> Self {
        Self::new(Cluster::from_url(json_rpc_url))
    }

    fn query(&self) -> String {
        match &self.cluster {
            Cluster::MainnetBeta => String::new(),
            Cluster::Devnet => "?cluster=devnet".to_string(),
            Cluster::Testnet => "?cluster=testnet".to_string(),
            Cluster::Custom(url) => format!(
                "?cluster=custom&customUrl={}",
                form_urlencoded::byte_serialize(url.as_bytes()).collect::<String>()
            ),
        }
    }

    pub fn address_url(&self, address: &Pubkey) -> String {
        format!("{}/address/{}{}", EXPLORER_URL, address, self.query())
    }

    pub fn transaction_url(&self, signature: &Signature) -> String {
        format!("{}/tx/{}{}", EXPLORER_URL, signature, self.query())
    }
}

/// Addresses and signatures produced by one complete run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkthroughOutput {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub receiver_token_account: Pubkey,
    pub mint_signature: Signature,
    pub metadata_signature: Option<Signature>,
    pub transfer_signature: Signature,
    pub burn_signature: Signature,
    /// Payer lamports left after the last step.
    pub payer_balance: u64,
}

impl fmt::Display for WalkthroughOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Mint: {}", self.mint)?;
        writeln!(f, "Token account: {}", self.token_account)?;
        writeln!(f, "Receiver token account: {}", self.receiver_token_account)?;
        writeln!(f, "Mint signature: {}", self.mint_signature)?;
        if let Some(signature) = self.metadata_signature {
            writeln!(f, "Metadata signature: {}", signature)?;
        }
        writeln!(f, "Transfer signature: {}", self.transfer_signature)?;
        writeln!(f, "Burn signature: {}", self.burn_signature)?;
        write!(f, "Payer balance: {} SOL", lamports_to_sol(self.payer_balance))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case("https://api.devnet.solana.com", Cluster::Devnet ; "devnet")]
    #[test_case("https://api.testnet.solana.com", Cluster::Testnet ; "testnet")]
    #[test_case("https://api.mainnet-beta.solana.com", Cluster::MainnetBeta ; "mainnet")]
    #[test_case(
        "http://localhost:8899",
        Cluster::Custom("http://localhost:8899".to_string())
        ; "localhost"
    )]
    fn detects_cluster(url: &str, expected: Cluster) {
        assert_eq!(Cluster::from_url(url), expected);
    }

    #[test]
    fn address_links() {
        let address = Pubkey::new_unique();
        assert_eq!(
            Explorer::from_url("https://api.devnet.solana.com").address_url(&address),
            format!("https://explorer.solana.com/address/{}?cluster=devnet", address)
        );
        assert_eq!(
            Explorer::from_url("https://api.mainnet-beta.solana.com").address_url(&address),
            format!("https://explorer.solana.com/address/{}", address)
        );
    }

    #[test]
    fn custom_cluster_link_encodes_url() {
        let signature = Signature::default();
        assert_eq!(
            Explorer::from_url("http://localhost:8899").transaction_url(&signature),
            format!(
                "https://explorer.solana.com/tx/{}?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899",
                signature
            )
        );
    }
}
