pub use bitcoin::hashes::{hash_newtype, sha256d, Hash, HashEngine};

/// Double-SHA256 of the concatenation of two 32-byte hash values.
///
/// This is the node combiner used by every merkle structure in the protocol:
/// transaction trees, the coinbase inclusion branch, and the chain merkle
/// tree embedded in a merged-mining coinbase.
pub fn combine_hashes(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut engine = sha256d::Hash::engine();
    engine.input(left);
    engine.input(right);
    sha256d::Hash::from_engine(engine).to_byte_array()
}
