use std::{fmt::Display, str::FromStr};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::traits::AddressExtractor;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
const OP_EQUAL: u8 = 0x87;
const PUSH_20: u8 = 0x14;

/// The chain whose address version bytes are used when rendering addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    pub fn pubkey_hash_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet | Network::Regtest => 0x6f,
        }
    }

    pub fn script_hash_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet | Network::Regtest => 0xc4,
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
            Network::Regtest => f.write_str("regtest"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "test" | "testnet3" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            other => Err(format!("Unknown network: {other}")),
        }
    }
}

/// Recognises pay-to-pubkey-hash and pay-to-script-hash output scripts and renders their base58check addresses.
///
/// Any other script template (bare multisig, witness programs, OP_RETURN data) yields no addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScriptExtractor {
    network: Network,
}

impl StandardScriptExtractor {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn encode(version: u8, hash: &[u8]) -> String {
        let mut payload = Vec::with_capacity(hash.len() + 1);
        payload.push(version);
        payload.extend_from_slice(hash);
        bs58::encode(payload).with_check().into_string()
    }
}

impl AddressExtractor for StandardScriptExtractor {
    fn extract_addresses(&self, script: &[u8]) -> Vec<String> {
        match script {
            [OP_DUP, OP_HASH160, PUSH_20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if hash.len() == 20 => {
                vec![Self::encode(self.network.pubkey_hash_version(), hash)]
            },
            [OP_HASH160, PUSH_20, hash @ .., OP_EQUAL] if hash.len() == 20 => {
                vec![Self::encode(self.network.script_hash_version(), hash)]
            },
            _ => {
                trace!("🔍️ Script {} is not a standard template. No address extracted.", hex::encode(script));
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn p2pkh(hash: [u8; 20]) -> Vec<u8> {
        let mut script = vec![OP_DUP, OP_HASH160, PUSH_20];
        script.extend_from_slice(&hash);
        script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        script
    }

    fn p2sh(hash: [u8; 20]) -> Vec<u8> {
        let mut script = vec![OP_HASH160, PUSH_20];
        script.extend_from_slice(&hash);
        script.push(OP_EQUAL);
        script
    }

    #[test]
    fn mainnet_pubkey_hash() {
        let extractor = StandardScriptExtractor::new(Network::Mainnet);
        let addrs = extractor.extract_addresses(&p2pkh([0u8; 20]));
        assert_eq!(addrs, vec!["1111111111111111111114oLvT2".to_string()]);
    }

    #[test]
    fn testnet_versions() {
        let extractor = StandardScriptExtractor::new(Network::Testnet);
        let addr = extractor.extract_addresses(&p2pkh([7u8; 20])).pop().unwrap();
        assert!(bs58::decode(&addr).with_check(Some(0x6f)).into_vec().is_ok());
        let addr = extractor.extract_addresses(&p2sh([7u8; 20])).pop().unwrap();
        assert!(bs58::decode(&addr).with_check(Some(0xc4)).into_vec().is_ok());
        assert!(addr.starts_with('2'));
    }

    #[test]
    fn mainnet_script_hash() {
        let extractor = StandardScriptExtractor::default();
        let addr = extractor.extract_addresses(&p2sh([1u8; 20])).pop().unwrap();
        assert!(addr.starts_with('3'));
        assert!(bs58::decode(&addr).with_check(Some(0x05)).into_vec().is_ok());
    }

    #[test]
    fn non_standard_scripts_yield_nothing() {
        let extractor = StandardScriptExtractor::default();
        assert!(extractor.extract_addresses(&[]).is_empty());
        assert!(extractor.extract_addresses(&[0x6a, 0x04, 1, 2, 3, 4]).is_empty());
        // Truncated P2PKH
        let mut script = p2pkh([2u8; 20]);
        script.remove(5);
        assert!(extractor.extract_addresses(&script).is_empty());
    }

    #[test]
    fn networks_parse_from_config_strings() {
        assert_eq!("MainNet".parse::<Network>(), Ok(Network::Mainnet));
        assert_eq!("testnet3".parse::<Network>(), Ok(Network::Testnet));
        assert_eq!("regtest".parse::<Network>(), Ok(Network::Regtest));
        assert!("dogecoin".parse::<Network>().is_err());
    }
}
