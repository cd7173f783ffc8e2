use bitcoin::{BlockHash, Txid};
use hex::FromHex;

use crate::hashes::Hash;

/// Convert a hex string in internal byte order to a hash type.
pub fn hex_to_hash<T>(hex: &str) -> Result<T, hex::FromHexError>
where
    T: From<[u8; 32]>,
{
    let bytes = <[u8; 32]>::from_hex(hex)?;
    Ok(T::from(bytes))
}

/// Convert a hex string in internal byte order to a Txid.
pub fn hex_to_txid(hex: &str) -> Result<Txid, hex::FromHexError> {
    let bytes = <[u8; 32]>::from_hex(hex)?;
    Ok(Txid::from_byte_array(bytes))
}

/// Convert a hex string in internal byte order to a BlockHash.
pub fn hex_to_blockhash(hex: &str) -> Result<BlockHash, hex::FromHexError> {
    let bytes = <[u8; 32]>::from_hex(hex)?;
    Ok(BlockHash::from_byte_array(bytes))
}

/// Convert a hex string in display order (the reversed form printed by
/// explorers and carried in the checkpoint tables) to a BlockHash.
pub fn display_hex_to_blockhash(hex: &str) -> Result<BlockHash, hex::FromHexError> {
    let mut bytes = <[u8; 32]>::from_hex(hex)?;
    bytes.reverse();
    Ok(BlockHash::from_byte_array(bytes))
}
