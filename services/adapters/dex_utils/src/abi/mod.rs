//! ABI definitions and output decoding for pool recognition queries
//!
//! # Supported Protocols
//! - Uniswap V2 and forks (Sushiswap, Quickswap V2)
//! - Uniswap V3 and forks (Quickswap V3)

pub mod uniswap_v2;
pub mod uniswap_v3;

use ethabi::{Function, Token};
use types::Address;

/// Largest value representable by a Solidity `uint24`.
pub const MAX_UINT24: u32 = 0x00FF_FFFF;

/// Error types for ABI encoding and decoding
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("ABI encoding failed for {function}: {reason}")]
    Encoding { function: String, reason: String },

    #[error("ABI decoding failed for {function}: {reason}")]
    Decoding { function: String, reason: String },

    #[error("Unexpected return shape from {0}")]
    UnexpectedOutput(String),

    #[error("Value out of range for {function}: {value}")]
    ValueOutOfRange { function: String, value: String },
}

/// Encode calldata for `function` with the given arguments.
pub fn encode_call(function: &Function, args: &[Token]) -> Result<Vec<u8>, AbiError> {
    function
        .encode_input(args)
        .map_err(|e| AbiError::Encoding {
            function: function.signature(),
            reason: e.to_string(),
        })
}

fn decode_single(function: &Function, data: &[u8]) -> Result<Token, AbiError> {
    let mut tokens = function
        .decode_output(data)
        .map_err(|e| AbiError::Decoding {
            function: function.signature(),
            reason: e.to_string(),
        })?;

    if tokens.len() != 1 {
        return Err(AbiError::UnexpectedOutput(function.signature()));
    }
    Ok(tokens.remove(0))
}

/// Decode a function's single `address` return value.
pub fn decode_address(function: &Function, data: &[u8]) -> Result<Address, AbiError> {
    match decode_single(function, data)? {
        Token::Address(address) => Ok(address),
        _ => Err(AbiError::UnexpectedOutput(function.signature())),
    }
}

/// Decode a function's single `uint24` return value (V3 fee tier).
///
/// `ethabi` reads the full 32-byte word, so the `uint24` bound is enforced
/// here.
pub fn decode_fee_tier(function: &Function, data: &[u8]) -> Result<u32, AbiError> {
    match decode_single(function, data)? {
        Token::Uint(value) if value <= MAX_UINT24.into() => Ok(value.low_u32()),
        Token::Uint(value) => Err(AbiError::ValueOutOfRange {
            function: function.signature(),
            value: value.to_string(),
        }),
        _ => Err(AbiError::UnexpectedOutput(function.signature())),
    }
}

/// Build a `view` function definition taking `inputs` and returning `outputs`.
#[allow(deprecated)]
pub(crate) fn view_function(
    name: &str,
    inputs: Vec<ethabi::Param>,
    outputs: Vec<ethabi::Param>,
) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        constant: None,
        state_mutability: ethabi::StateMutability::View,
    }
}

pub(crate) fn param(name: &str, kind: ethabi::ParamType) -> ethabi::Param {
    ethabi::Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}
