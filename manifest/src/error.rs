// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("line {line}: malformed manifest entry '{text}', expected 'key=value'")]
    MalformedLine { line: usize, text: Box<str> },
}
