// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
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

//! Client certificate selection.
//!
//! [`select_client_certificate`] picks exactly one certificate with the Client
//! Authentication usage from a [`CertificateStore`]:
//!
//! 1. A serial number that matches exactly one client-auth certificate is
//!    returned immediately.
//! 2. A single client-auth candidate is returned without asking.
//! 3. Several candidates are handed to a [`CertificatePrompt`], which picks one.
//! 4. No candidates fail with [`ClientError::NoCandidateCertificate`].
//!
//! # Example
//!
//! ```no_run
//! use ejbca_admin_client::certstore::PemDirectoryStore;
//! use ejbca_admin_client::selector::{select_client_certificate, ConsolePrompt};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PemDirectoryStore::default_location()?;
//! let mut prompt = ConsolePrompt::stdio();
//! let cert = select_client_certificate(&store, None, &mut prompt)?;
//! println!("Using {}", cert.display_name);
//! # Ok(())
//! # }
//! ```

use std::io::{BufRead, Write};

use crate::certstore::{CertificateStore, ClientCertificate};
use crate::error::{ClientError, Result};

/// Chooses one certificate among several candidates.
///
/// Returns the zero-based index of the chosen candidate.
pub trait CertificatePrompt {
    /// Pick one of `candidates`, which always holds at least two entries.
    fn choose(&mut self, candidates: &[ClientCertificate]) -> Result<usize>;
}

impl<F> CertificatePrompt for F
where
    F: FnMut(&[ClientCertificate]) -> Result<usize>,
{
    fn choose(&mut self, candidates: &[ClientCertificate]) -> Result<usize> {
        self(candidates)
    }
}

/// Select a client-authentication certificate from `store`.
///
/// # Errors
///
/// Returns [`ClientError::NoCandidateCertificate`] if the store holds no
/// certificate with the Client Authentication usage, or any error raised by
/// the store or the prompt.
pub fn select_client_certificate(
    store: &dyn CertificateStore,
    serial_number: Option<&str>,
    prompt: &mut dyn CertificatePrompt,
) -> Result<ClientCertificate> {
    let all = store.list_certificates()?;

    if let Some(serial) = serial_number.filter(|s| !s.trim().is_empty()) {
        let mut matches = all.iter().filter(|c| c.matches_serial(serial));
        match (matches.next(), matches.next()) {
            (Some(cert), None) if cert.has_client_auth() => {
                tracing::debug!("Selected certificate by serial number {}", serial);
                return Ok(cert.clone());
            }
            (Some(_), None) => {
                tracing::warn!(
                    "Certificate with serial number {} has no Client Authentication usage",
                    serial
                );
            }
            (None, _) => {
                tracing::warn!("No certificate with serial number {} found", serial);
            }
            (Some(_), Some(_)) => {
                tracing::warn!("Serial number {} matches several certificates", serial);
            }
        }
    }

    let mut candidates: Vec<ClientCertificate> =
        all.into_iter().filter(ClientCertificate::has_client_auth).collect();

    match candidates.len() {
        0 => Err(ClientError::NoCandidateCertificate),
        1 => Ok(candidates.remove(0)),
        n => {
            let index = prompt.choose(&candidates)?;
            if index >= n {
                return Err(ClientError::invalid_selection(format!(
                    "index {} is out of range (0..{})",
                    index, n
                )));
            }
            Ok(candidates.swap_remove(index))
        }
    }
}

/// Render the candidate table shown to the operator.
///
/// Rows are numbered from 1.
pub fn format_candidate_table(candidates: &[ClientCertificate]) -> String {
    let name_width = candidates
        .iter()
        .map(|c| c.display_name.len())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);
    let issuer_width = candidates
        .iter()
        .map(|c| c.issuer_cn.as_deref().unwrap_or("-").len())
        .chain(std::iter::once("Issuer".len()))
        .max()
        .unwrap_or(6);

    let mut out = format!(
        "{:>3}  {:<name_width$}  {:<issuer_width$}  Serial Number\n",
        "#", "Name", "Issuer"
    );
    for (i, cert) in candidates.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<name_width$}  {:<issuer_width$}  {}\n",
            i + 1,
            cert.display_name,
            cert.issuer_cn.as_deref().unwrap_or("-"),
            cert.serial_number
        ));
    }
    out
}

/// Parse an operator's 1-based choice into a zero-based index.
pub fn parse_selection(input: &str, count: usize) -> Result<usize> {
    let trimmed = input.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| ClientError::invalid_selection(format!("'{}' is not a number", trimmed)))?;

    if choice == 0 || choice > count {
        return Err(ClientError::invalid_selection(format!(
            "{} is not between 1 and {}",
            choice, count
        )));
    }

    Ok(choice - 1)
}

/// Interactive prompt reading the choice from a console.
///
/// Invalid input is reported and the question asked again; the prompt blocks
/// until a valid number is entered or the input ends.
pub struct ConsolePrompt<R, W> {
    reader: R,
    writer: W,
}

impl ConsolePrompt<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on standard input, writing the menu to standard error.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    /// Create a prompt over the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompt, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> CertificatePrompt for ConsolePrompt<R, W> {
    fn choose(&mut self, candidates: &[ClientCertificate]) -> Result<usize> {
        writeln!(
            self.writer,
            "Several client authentication certificates are available:\n"
        )?;
        write!(self.writer, "{}", format_candidate_table(candidates))?;
        writeln!(self.writer)?;

        loop {
            write!(
                self.writer,
                "Select a certificate [1-{}]: ",
                candidates.len()
            )?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "input closed before a certificate was selected",
                )
                .into());
            }

            match parse_selection(&line, candidates.len()) {
                Ok(index) => return Ok(index),
                Err(e) => writeln!(self.writer, "{}", e)?,
            }
        }
    }
}
