// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use tracing_subscriber::{
    fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Overrides the default log targets, using the `RUST_LOG` directive syntax.
pub const LOG_ENV: &str = "DISTRIBUTOR_LOG";
const DEFAULT_LOG_TARGETS: &str = "distributor_evm=info,distributor_cli=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Default,
    Json,
}

impl LogFormat {
    pub fn parse_from_str(val: &str) -> Result<Self, String> {
        match val {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            _ => Err(
                "The only valid values for this argument are \"default\" or \"json\"".to_string(),
            ),
        }
    }
}

fn env_filter() -> EnvFilter {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_LOG_TARGETS),
    }
}

/// Logs go to stderr so stdout only carries the report.
///
/// Logging should be initialized only once.
pub fn init_logging(format: Option<LogFormat>) {
    let layer = match format.unwrap_or(LogFormat::Default) {
        LogFormat::Default => tracing_fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        LogFormat::Json => tracing_fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    if tracing_subscriber::registry()
        .with(layer.with_filter(env_filter()))
        .try_init()
        .is_err()
    {
        eprintln!("Tried to initialize and set global default subscriber more than once");
    }
}
