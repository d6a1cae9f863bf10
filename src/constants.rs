//! Bitcoin constants used by the key, address and transaction code

/// Satoshis per BTC
pub const SATOSHIS_PER_BTC: i64 = 100_000_000;

/// Maximum money supply: 21,000,000 BTC in satoshis
pub const MAX_MONEY: i64 = 21_000_000 * SATOSHIS_PER_BTC;

/// Default spend fee: 0.0001 BTC
pub const DEFAULT_FEE: i64 = 10_000;

/// Version byte of a mainnet P2PKH address
pub const P2PKH_ADDRESS_VERSION: u8 = 0x00;

/// Version byte of a mainnet WIF private key
pub const WIF_VERSION: u8 = 0x80;

/// Trailing WIF byte marking a compressed public key
pub const WIF_COMPRESSION_FLAG: u8 = 0x01;

/// Length of a decoded address: version + hash160 + checksum
pub const ADDRESS_DECODED_LEN: usize = 25;

/// Base58Check checksum length
pub const CHECKSUM_LEN: usize = 4;

/// Private key scalar length
pub const PRIVATE_KEY_LEN: usize = 32;

/// Public key encodings
pub const COMPRESSED_PUBKEY_LEN: usize = 33;
pub const UNCOMPRESSED_PUBKEY_LEN: usize = 65;

/// Bitcoin Base58 alphabet (no 0, O, I, l)
pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Mini private keys start with this character
pub const MINI_KEY_PREFIX: char = 'S';

/// Accepted mini private key lengths
pub const MINI_KEY_LENGTHS: [usize; 3] = [22, 26, 30];

/// Length of generated mini private keys
pub const MINI_KEY_GENERATED_LEN: usize = 30;

/// Script opcodes recognized by the P2PKH pattern
pub const OP_DUP: u8 = 0x76;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Signature hash type covering all inputs and outputs
pub const SIGHASH_ALL: u8 = 0x01;

/// Version of transactions built by this crate
pub const TX_VERSION: u32 = 1;

/// Sequence number for final transaction
pub const SEQUENCE_FINAL: u32 = 0xffffffff;
