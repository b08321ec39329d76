// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::speech;

/// Name of the optional per-workbook configuration file.
pub const CONFIG_FILE: &str = "vocadrill.toml";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Port the web interface binds to.
    pub port: u16,
    /// Language code passed to the speech synthesizer.
    pub language: String,
    /// Whether to open the browser once the server is up.
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            language: speech::DEFAULT_LANGUAGE.to_string(),
            open_browser: true,
        }
    }
}

/// Read the workbook's configuration file, if present.
pub fn load_config(directory: &Path) -> Fallible<Config> {
    let path = directory.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}
