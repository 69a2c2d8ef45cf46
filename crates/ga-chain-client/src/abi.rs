//! Call encoding over a contract's JSON ABI.
//!
//! Arguments arrive as user text and are coerced to the declared Solidity
//! type; return data is rendered back to text for display.

use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Address;
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::str::FromStr;

/// Parses a descriptor ABI document (a JSON array of items).
pub fn parse_abi(abi: &Value) -> Result<JsonAbi> {
    if !abi.is_array() {
        bail!("ABI is not a JSON array");
    }
    serde_json::from_value(abi.clone()).context("ABI is not a valid contract ABI")
}

/// `0x`-prefixed 20-byte account; checksum casing is not enforced.
pub fn parse_address(address: &str) -> Result<Address> {
    if !address.starts_with("0x") {
        bail!("address {address:?} lacks the 0x prefix");
    }
    Address::from_str(address).with_context(|| format!("address {address:?} is not a 20-byte hex account"))
}

/// The overload of `name` taking `arity` inputs.
pub fn find_function<'a>(abi: &'a JsonAbi, name: &str, arity: usize) -> Result<&'a Function> {
    abi.function(name)
        .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == arity))
        .ok_or_else(|| anyhow!("ABI has no function {name} taking {arity} argument(s)"))
}

/// Selector followed by the encoded arguments.
pub fn encode_call(function: &Function, args: &[String]) -> Result<Vec<u8>> {
    if args.len() != function.inputs.len() {
        bail!(
            "{} expects {} argument(s), got {}",
            function.name,
            function.inputs.len(),
            args.len()
        );
    }

    let values = function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let kind = param
                .resolve()
                .with_context(|| format!("{} input type {}", function.name, param.ty))?;
            kind.coerce_str(arg)
                .with_context(|| format!("invalid {} argument {arg:?}", param.ty))
        })
        .collect::<Result<Vec<DynSolValue>>>()?;

    function
        .abi_encode_input(&values)
        .with_context(|| format!("{} call encoding", function.name))
}

/// Renders the first return value of an `eth_call` result as text.
pub fn decode_first_output(function: &Function, data: &[u8]) -> Result<String> {
    if function.outputs.is_empty() {
        bail!("{} declares no outputs", function.name);
    }
    let values = function
        .abi_decode_output(data)
        .with_context(|| format!("{} return data", function.name))?;
    values
        .first()
        .map(render)
        .ok_or_else(|| anyhow!("{} returned nothing", function.name))
}

fn render(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => format!("0x{}", hex::encode(address.as_slice())),
        DynSolValue::Bool(flag) => flag.to_string(),
        DynSolValue::Uint(number, _) => number.to_string(),
        DynSolValue::Int(number, _) => number.to_string(),
        DynSolValue::String(text) => text.clone(),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        other => format!("{other:?}"),
    }
}

pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.len() % 2 == 1 {
        return Ok(hex::decode(format!("0{digits}"))?);
    }
    Ok(hex::decode(digits)?)
}
