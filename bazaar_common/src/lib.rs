pub mod helpers;
pub mod op;
mod satoshis;

pub use satoshis::{Satoshis, SatoshisConversionError, BITCOIN_CURRENCY_CODE, SATOSHIS_PER_BITCOIN};
