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

use crate::error::Fallible;
use crate::error::fail;

/// Language passed to the synthesis endpoint when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

const ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Ask the external text-to-speech service to speak `text`. Returns MP3
/// bytes. Callers treat failure as "no audio": it is reported, never
/// allowed to interrupt a session.
pub async fn synthesize(client: &reqwest::Client, text: &str, lang: &str) -> Fallible<Vec<u8>> {
    let response = client
        .get(ENDPOINT)
        .query(&[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", lang), ("q", text)])
        .send()
        .await?;
    if !response.status().is_success() {
        return fail("speech synthesis request failed.");
    }
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
