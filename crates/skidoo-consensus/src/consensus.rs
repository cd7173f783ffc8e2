/// Chain parameters for the Skidoo networks.
pub mod params;

pub use bitcoin::consensus::encode::{
    Decodable, Encodable, Error as EncodeDecodeError, VarInt, MAX_VEC_SIZE,
};
pub use params::{modifiable_params, params, select_params, ChainParams, Params};
