//! Unit tests for chain-agnostic identifiers and addresses

use siws_wallet_core::{
    ChainAgnosticAddress, ChainAgnosticId, Error, POLKADOT_CHAIN_NAMESPACE, PolkadotAddress,
    PolkadotChainId,
};
use std::fmt;

const GENESIS_HASH: &str = "0x060ca79d9743b0ca58cabe294b9545a492e69de00c65154dba1f236b4a3ae5c0";
const ADDRESS: &str = "5Dc96kiTPTfZHmq6yTFSqejJzfUNfQQjneNesRWf9MDppJsd";

/// Stand-in for a block hash type: all that matters is its Display impl
struct BlockHash([u8; 32]);

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

fn block_hash() -> BlockHash {
    let bytes = hex::decode(GENESIS_HASH.trim_start_matches("0x")).unwrap();
    BlockHash(bytes.try_into().unwrap())
}

// ============================================================================
// ChainAgnosticAddress Tests
// ============================================================================

#[test]
fn test_construct_by_namespace_reference_and_address() {
    let chain_id = ChainAgnosticId::new("eip155", GENESIS_HASH).unwrap();
    let address = ChainAgnosticAddress::new("eip155", GENESIS_HASH, ADDRESS).unwrap();

    assert_eq!(address.chain_id(), &chain_id);
    assert_eq!(address.address(), ADDRESS);
}

#[test]
fn test_construct_by_id_and_address() {
    let polkadot_id = PolkadotChainId::new(GENESIS_HASH).unwrap();
    let address = ChainAgnosticAddress::from_chain_id(polkadot_id.clone(), ADDRESS).unwrap();

    assert_eq!(address.chain_id(), &polkadot_id);
    assert_eq!(address.address(), ADDRESS);
}

#[test]
fn test_missing_address_fails_for_every_constructor() {
    let polkadot_id = PolkadotChainId::new(GENESIS_HASH).unwrap();

    assert!(matches!(
        ChainAgnosticAddress::new(POLKADOT_CHAIN_NAMESPACE, GENESIS_HASH, ""),
        Err(Error::MissingAddress)
    ));
    assert!(matches!(
        ChainAgnosticAddress::from_chain_id(polkadot_id.clone(), ""),
        Err(Error::MissingAddress)
    ));
    assert!(matches!(
        PolkadotAddress::new(GENESIS_HASH, ""),
        Err(Error::MissingAddress)
    ));
    assert!(matches!(
        PolkadotAddress::from_chain_id(polkadot_id.clone(), ""),
        Err(Error::MissingAddress)
    ));
    assert!(matches!(
        polkadot_id.to_string().parse::<ChainAgnosticAddress>(),
        Err(Error::MissingAddress)
    ));
}

#[test]
fn test_missing_address_message() {
    let err = ChainAgnosticAddress::new(POLKADOT_CHAIN_NAMESPACE, GENESIS_HASH, "").unwrap_err();
    assert_eq!(err.to_string(), "No address supplied");
}

#[test]
fn test_to_string_format() {
    let chain_id = ChainAgnosticId::new("eip155", GENESIS_HASH).unwrap();
    let address = ChainAgnosticAddress::new("eip155", GENESIS_HASH, ADDRESS).unwrap();

    assert_eq!(address.to_string(), format!("{chain_id}:{ADDRESS}"));
    assert_eq!(
        address.to_string(),
        format!(
            "{}:{}:{}",
            chain_id.namespace(),
            chain_id.reference(),
            ADDRESS
        )
    );
}

#[test]
fn test_address_parse_round_trip() {
    let address = ChainAgnosticAddress::new("eip155", "1", "0xab16a96D359eC26a11e2C2b3d8f8B8942d5Bfcdb")
        .unwrap();
    let parsed: ChainAgnosticAddress = address.to_string().parse().unwrap();
    assert_eq!(parsed, address);
}

#[test]
fn test_structural_equality() {
    let a = ChainAgnosticAddress::new("polkadot", GENESIS_HASH, ADDRESS).unwrap();
    let b = ChainAgnosticAddress::new("polkadot", GENESIS_HASH, ADDRESS).unwrap();
    let other_chain = ChainAgnosticAddress::new("kusama", GENESIS_HASH, ADDRESS).unwrap();
    let other_address = ChainAgnosticAddress::new("polkadot", GENESIS_HASH, "5Other").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, other_chain);
    assert_ne!(a, other_address);
}

// ============================================================================
// PolkadotAddress Tests
// ============================================================================

#[test]
fn test_polkadot_address_from_string() {
    let polkadot_id = PolkadotChainId::new(GENESIS_HASH).unwrap();
    let address = PolkadotAddress::new(GENESIS_HASH, ADDRESS).unwrap();

    assert_eq!(address.chain_id(), &polkadot_id);
    assert_eq!(address.address(), ADDRESS);
    assert_eq!(address.chain_id().namespace(), POLKADOT_CHAIN_NAMESPACE);
}

#[test]
fn test_polkadot_address_from_block_hash() {
    let from_hash = PolkadotAddress::new(block_hash(), ADDRESS).unwrap();
    let from_str = PolkadotAddress::new(GENESIS_HASH, ADDRESS).unwrap();

    assert_eq!(from_hash, from_str);
}

#[test]
fn test_polkadot_address_from_chain_id() {
    let id = PolkadotChainId::new(GENESIS_HASH).unwrap();
    let from_id = PolkadotAddress::from_chain_id(id, ADDRESS).unwrap();
    let from_str = PolkadotAddress::new(GENESIS_HASH, ADDRESS).unwrap();

    assert_eq!(from_id, from_str);
}

#[test]
fn test_polkadot_address_converts_to_generic() {
    let polkadot = PolkadotAddress::new(GENESIS_HASH, ADDRESS).unwrap();
    let generic = ChainAgnosticAddress::new("polkadot", GENESIS_HASH, ADDRESS).unwrap();

    assert_eq!(ChainAgnosticAddress::from(polkadot.clone()), generic);
    assert_eq!(PolkadotAddress::try_from(generic).unwrap(), polkadot);
}

// ============================================================================
// ChainAgnosticId Tests
// ============================================================================

#[test]
fn test_chain_id_display_and_parse() {
    let id = ChainAgnosticId::new("cosmos", "cosmoshub-3").unwrap();
    assert_eq!(id.to_string(), "cosmos:cosmoshub-3");
    assert_eq!("cosmos:cosmoshub-3".parse::<ChainAgnosticId>().unwrap(), id);
}

#[test]
fn test_chain_id_invalid_format() {
    for (namespace, reference) in [
        ("", "1"),
        ("ab", "1"),
        ("abcdefghi", "1"),
        ("Eip155", "1"),
        ("eip_155", "1"),
        ("eip155", ""),
        ("eip155", "bad/ref"),
        ("eip155", "0123456789abcdefghijklmnopqrstuvw"),
    ] {
        assert!(
            matches!(
                ChainAgnosticId::new(namespace, reference),
                Err(Error::InvalidFormat(_))
            ),
            "{namespace}:{reference} should be rejected"
        );
    }
}

#[test]
fn test_chain_id_parse_without_separator() {
    assert!(matches!(
        "polkadot".parse::<ChainAgnosticId>(),
        Err(Error::InvalidFormat(_))
    ));
}

#[test]
fn test_polkadot_chain_id_from_block_hash() {
    assert_eq!(
        PolkadotChainId::new(block_hash()).unwrap(),
        PolkadotChainId::new(GENESIS_HASH).unwrap()
    );
}

/// Block hash type whose Display leaves out the `0x` prefix
struct BareBlockHash([u8; 32]);

impl fmt::Display for BareBlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[test]
fn test_polkadot_chain_id_from_unprefixed_hash() {
    let BlockHash(bytes) = block_hash();
    let bare = PolkadotChainId::new(BareBlockHash(bytes)).unwrap();

    assert_eq!(bare, PolkadotChainId::new(GENESIS_HASH).unwrap());
    assert_eq!(bare.reference(), "060ca79d9743b0ca58cabe294b9545a4");
    assert_eq!(
        PolkadotChainId::new(&GENESIS_HASH[2..]).unwrap(),
        PolkadotChainId::new(GENESIS_HASH).unwrap()
    );
}

#[test]
fn test_short_hex_reference_round_trips() {
    let id = ChainAgnosticId::new("eip155", "0x1").unwrap();
    assert_eq!(id.to_string(), "eip155:0x1");
    assert_eq!("eip155:0x1".parse::<ChainAgnosticId>().unwrap(), id);

    let address = ChainAgnosticAddress::new("eip155", "0xabc", "acct").unwrap();
    assert_eq!(address.to_string(), "eip155:0xabc:acct");
}
