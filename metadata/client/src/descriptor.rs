use serde::{Deserialize, Serialize};

/// Off-chain JSON document referenced by the metadata record's URI.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TokenDescriptor {
    pub name: String,
    pub description: String,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_expected_keys() {
        let descriptor = TokenDescriptor {
            name: "Symbol".to_string(),
            description: "Chase signal among noise.".to_string(),
            image: "https://arweave.net/image".to_string(),
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Symbol",
                "description": "Chase signal among noise.",
                "image": "https://arweave.net/image",
            })
        );
    }
}
