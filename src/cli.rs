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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_workbook;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_workbook_stats;
use crate::error::Fallible;
use crate::web::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the drill web interface.
    Serve {
        /// Optional path to the workbook directory.
        workbook: Option<String>,
        /// Override the configured port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate the workbook's sheets.
    Check {
        /// Optional path to the workbook directory.
        workbook: Option<String>,
    },
    /// Print workbook statistics.
    Stats {
        /// Optional path to the workbook directory.
        workbook: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

fn workbook_directory(workbook: Option<String>) -> Fallible<PathBuf> {
    match workbook {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve { workbook, port } => {
            let directory = workbook_directory(workbook)?;
            start_server(directory, port).await
        }
        Command::Check { workbook } => check_workbook(&workbook_directory(workbook)?),
        Command::Stats { workbook, format } => {
            print_workbook_stats(&workbook_directory(workbook)?, format)
        }
    }
}
