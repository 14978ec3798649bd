//! Uniswap V2 and compatible protocol ABIs
//!
//! Read-only functions of V2 pairs and V2 factories (Sushiswap, Quickswap V2,
//! etc). V3 pools expose the same `factory`/`token0`/`token1` getters, so the
//! pair functions here are shared by both protocol versions.

use ethabi::{Function, ParamType, Token};
use once_cell::sync::Lazy;
use types::Address;

use super::{encode_call, param, view_function, AbiError};

/// function factory() external view returns (address)
pub static FACTORY: Lazy<Function> = Lazy::new(|| {
    view_function("factory", vec![], vec![param("", ParamType::Address)])
});

/// function token0() external view returns (address)
pub static TOKEN0: Lazy<Function> = Lazy::new(|| {
    view_function("token0", vec![], vec![param("", ParamType::Address)])
});

/// function token1() external view returns (address)
pub static TOKEN1: Lazy<Function> = Lazy::new(|| {
    view_function("token1", vec![], vec![param("", ParamType::Address)])
});

/// function getPair(address tokenA, address tokenB) external view returns (address pair)
pub static GET_PAIR: Lazy<Function> = Lazy::new(|| {
    view_function(
        "getPair",
        vec![
            param("tokenA", ParamType::Address),
            param("tokenB", ParamType::Address),
        ],
        vec![param("pair", ParamType::Address)],
    )
});

/// Calldata for `factory()`
pub fn factory_call() -> Result<Vec<u8>, AbiError> {
    encode_call(&FACTORY, &[])
}

/// Calldata for `token0()`
pub fn token0_call() -> Result<Vec<u8>, AbiError> {
    encode_call(&TOKEN0, &[])
}

/// Calldata for `token1()`
pub fn token1_call() -> Result<Vec<u8>, AbiError> {
    encode_call(&TOKEN1, &[])
}

/// Calldata for `getPair(token_a, token_b)`
pub fn get_pair_call(token_a: Address, token_b: Address) -> Result<Vec<u8>, AbiError> {
    encode_call(&GET_PAIR, &[Token::Address(token_a), Token::Address(token_b)])
}
