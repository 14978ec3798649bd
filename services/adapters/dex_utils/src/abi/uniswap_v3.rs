//! Uniswap V3 and compatible protocol ABIs
//!
//! The V3-only reads: a pool's fee tier and the factory's canonical pool
//! lookup keyed by (tokenA, tokenB, fee).

use ethabi::{Function, ParamType, Token};
use once_cell::sync::Lazy;
use types::{Address, U256};

use super::{encode_call, param, view_function, AbiError};

/// function fee() external view returns (uint24)
pub static FEE: Lazy<Function> =
    Lazy::new(|| view_function("fee", vec![], vec![param("", ParamType::Uint(24))]));

/// function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool)
pub static GET_POOL: Lazy<Function> = Lazy::new(|| {
    view_function(
        "getPool",
        vec![
            param("tokenA", ParamType::Address),
            param("tokenB", ParamType::Address),
            param("fee", ParamType::Uint(24)),
        ],
        vec![param("pool", ParamType::Address)],
    )
});

/// Calldata for `fee()`
pub fn fee_call() -> Result<Vec<u8>, AbiError> {
    encode_call(&FEE, &[])
}

/// Calldata for `getPool(token_a, token_b, fee)`
pub fn get_pool_call(token_a: Address, token_b: Address, fee: u32) -> Result<Vec<u8>, AbiError> {
    encode_call(
        &GET_POOL,
        &[
            Token::Address(token_a),
            Token::Address(token_b),
            Token::Uint(U256::from(fee)),
        ],
    )
}
