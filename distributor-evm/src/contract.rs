// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::{Bytecode, U256};
use crate::error::{Error, Result};
use crate::resolver::DeploymentParameters;
use alloy::sol;
use alloy::sol_types::SolConstructor;
use std::path::Path;

sol!(
    #[allow(missing_docs)]
    contract MasterChef {
        constructor(
            address mainToken,
            address treasury,
            address weth,
            uint256 wethPerSecond,
            uint256 startTime,
            address yieldBooster
        );
    }
);

/// ABI encoded constructor arguments, in the order the distributor expects them.
pub fn encode_constructor_args(params: &DeploymentParameters) -> Vec<u8> {
    MasterChef::constructorCall {
        mainToken: params.reward_token,
        treasury: params.treasury,
        weth: params.wrapped_native_token,
        wethPerSecond: params.emission_rate_per_second,
        startTime: U256::from(params.start_timestamp),
        yieldBooster: params.booster,
    }
    .abi_encode()
}

/// Contract creation input: compiled bytecode followed by the encoded constructor arguments.
pub fn creation_code(bytecode: &Bytecode, params: &DeploymentParameters) -> Bytecode {
    let mut code = bytecode.to_vec();
    code.extend(encode_constructor_args(params));
    code.into()
}

/// Read the creation bytecode from a compiled contract artifact.
///
/// Accepts Hardhat artifacts (`"bytecode": "0x.."`) and Foundry artifacts
/// (`"bytecode": { "object": "0x.." }`).
pub fn load_bytecode(path: &Path) -> Result<Bytecode> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| Error::Artifact(format!("{}: {err}", path.display())))?;
    let artifact: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|err| Error::Artifact(format!("{}: {err}", path.display())))?;

    let hex = match &artifact["bytecode"] {
        serde_json::Value::String(hex) => hex.as_str(),
        serde_json::Value::Object(object) => object
            .get("object")
            .and_then(|v| v.as_str())
            .unwrap_or_default(),
        _ => "",
    };

    let bytecode: Bytecode = hex
        .parse()
        .map_err(|err| Error::Artifact(format!("{}: invalid bytecode: {err}", path.display())))?;
    if bytecode.is_empty() {
        return Err(Error::Artifact(format!(
            "{}: artifact has no creation bytecode",
            path.display()
        )));
    }

    debug!(
        "Loaded {} bytes of creation bytecode from {}",
        bytecode.len(),
        path.display()
    );
    Ok(bytecode)
}
