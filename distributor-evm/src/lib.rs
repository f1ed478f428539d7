// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Deployment pipeline for the reward distributor contract.
//!
//! The pipeline is a one-way chain:
//! [`NetworkRegistry`] lookup, [`ParameterResolver`], [`DeploymentExecutor`], [`Report`].

#[macro_use]
extern crate tracing;

pub mod common;
pub mod contract;
pub mod error;
pub mod executor;
pub mod factory;
pub mod network;
pub mod report;
pub mod resolver;
pub mod testnet;
pub mod token_set;
pub mod transaction_config;

pub use error::{Error, Result};
pub use executor::{
    Confirmation, DeploymentExecutor, DeploymentResult, ExecutorConfig,
    DEFAULT_CONFIRMATION_TIMEOUT,
};
pub use factory::{
    AlloyFactory, ConfirmedDeployment, ContractFactory, FactoryError, PendingDeployment,
};
pub use network::{GasPolicy, NetworkId, NetworkProfile, NetworkRegistry};
pub use report::Report;
pub use resolver::{DeploymentParameters, EmissionSchedule, ParameterResolver};
pub use token_set::{TokenSet, Variant};
pub use transaction_config::{MaxFeePerGas, TransactionConfig};
