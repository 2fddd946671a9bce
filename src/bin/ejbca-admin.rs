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

//! EJBCA Administration Command-Line Tool
//!
//! Calls the EJBCA and SignServer REST APIs with a client certificate from
//! the personal certificate store.
//!
//! # Usage
//!
//! ```text
//! ejbca-admin [OPTIONS] <COMMAND>
//!
//! Commands:
//!   configdump  Export the CA configuration as JSON or ZIP
//!   status      Check that the configdump endpoint is enabled
//!   certs       List client certificates in the personal store
//!   enroll      Enroll a PKCS#10 request
//!   sign        Sign a document with a SignServer worker
//!   config      Profile management
//!
//! Options:
//!   -c, --config <PATH>   Path to profile file
//!   -s, --server <URL>    Override server URL
//!       --serial <HEX>    Use the client certificate with this serial number
//!   -v, --verbose         Enable verbose output
//!   -q, --quiet           Suppress non-error output
//!   -h, --help            Print help
//!   -V, --version         Print version
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Export everything as configdump.json
//! ejbca-admin configdump --server https://ejbca.example.com:8443
//!
//! # Export only CAs and certificate profiles as a ZIP archive
//! ejbca-admin configdump --format zip --include CA,CERTIFICATEPROFILE --outfile backup
//!
//! # Export without key bindings, choosing the certificate by serial number
//! ejbca-admin --serial 1A:2B:3C configdump --exclude KEYBINDING --exclude OCSPCONFIG
//!
//! # Sign a PDF
//! ejbca-admin sign --worker PDFSigner --input contract.pdf --output contract-signed.pdf
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ejbca_admin_client::certstore::CertificateStore;
use ejbca_admin_client::logging::{self, LogLevel};
use ejbca_admin_client::operations::{csr_to_pem, sign::parse_metadata};
use ejbca_admin_client::profile::{AdminProfile, ConfigLoader, default_config_path, write_default_config};
use ejbca_admin_client::selector::{ConsolePrompt, format_candidate_table, select_client_certificate};
use ejbca_admin_client::{
    AdminClient, ClientError, EnrollRequest, ExportFormat, Result, SignRequest,
};

/// EJBCA Administration Command-Line Tool
#[derive(Parser)]
#[command(name = "ejbca-admin")]
#[command(author = "U.S. Federal Government")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "EJBCA and SignServer administration over mutual TLS", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to profile file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override server URL
    #[arg(short, long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Use the client certificate with this serial number
    #[arg(long, global = true, value_name = "HEX")]
    serial: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the CA configuration as JSON or ZIP
    Configdump {
        /// Output format: json or zip
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<ExportFormat>,

        /// Export what can be exported instead of failing on the first error
        #[arg(long)]
        ignore_errors: bool,

        /// Include fields that still hold their default values
        #[arg(long)]
        include_defaults: bool,

        /// Include external CAs
        #[arg(long)]
        include_external_cas: bool,

        /// Export only these item types (takes precedence over --exclude)
        #[arg(long, value_name = "TYPE", value_delimiter = ',')]
        include: Vec<String>,

        /// Leave out these item types
        #[arg(long, value_name = "TYPE", value_delimiter = ',')]
        exclude: Vec<String>,

        /// Output base path; .json or .zip is appended
        #[arg(short, long, value_name = "PATH")]
        outfile: Option<PathBuf>,
    },

    /// Check that the configdump endpoint is enabled
    Status,

    /// List client certificates in the personal store
    Certs {
        /// Also list certificates without the Client Authentication usage
        #[arg(short, long)]
        all: bool,
    },

    /// Enroll a PKCS#10 request
    Enroll {
        /// CSR file (PEM or DER); generated when omitted
        #[arg(long, value_name = "PATH")]
        csr: Option<PathBuf>,

        /// Subject Common Name for a generated CSR
        #[arg(long, value_name = "CN")]
        common_name: Option<String>,

        /// Subject Organization for a generated CSR
        #[arg(long, value_name = "O")]
        organization: Option<String>,

        /// End entity username (defaults to the Common Name)
        #[arg(short, long)]
        username: Option<String>,

        /// End entity enrollment code (or EJBCA_ENROLL_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,

        /// Certificate profile name
        #[arg(long, value_name = "NAME")]
        certificate_profile: Option<String>,

        /// End entity profile name
        #[arg(long, value_name = "NAME")]
        end_entity_profile: Option<String>,

        /// Issuing CA name
        #[arg(long = "ca", value_name = "NAME")]
        certificate_authority: Option<String>,

        /// Do not request the CA chain
        #[arg(long)]
        no_chain: bool,

        /// Output base path; .pem (and .key for a generated key) is appended
        #[arg(short, long, value_name = "PATH")]
        outfile: Option<PathBuf>,
    },

    /// Sign a document with a SignServer worker
    Sign {
        /// Worker name or id
        #[arg(short, long)]
        worker: Option<String>,

        /// Document to sign
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Signed output (defaults to the input path plus .signed)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Request metadata as KEY=VALUE
        #[arg(short, long, value_name = "KEY=VALUE")]
        metadata: Vec<String>,
    },

    /// Profile management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective profile
    Show,

    /// Write an example profile
    Init {
        /// Destination (defaults to the per-user profile location)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let profile = if matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Init { .. }
        }
    ) {
        Ok(AdminProfile::default())
    } else {
        load_profile(&cli)
    };

    // Initialize logging
    let configured = profile.as_ref().ok().and_then(|p| p.logging.level);
    logging::init(LogLevel::from_flags(cli.verbose, cli.quiet, configured));

    let result = profile.and_then(|profile| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(run_command(&cli, &profile))
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            for line in e.operator_message().lines() {
                tracing::error!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_command(cli: &Cli, profile: &AdminProfile) -> Result<()> {
    match &cli.command {
        Commands::Configdump {
            format,
            ignore_errors,
            include_defaults,
            include_external_cas,
            include,
            exclude,
            outfile,
        } => {
            let mut request = profile.export_request();
            if let Some(format) = format {
                request.format = *format;
            }
            request.ignore_errors |= *ignore_errors;
            request.include_defaults |= *include_defaults;
            request.include_external_cas |= *include_external_cas;
            if !include.is_empty() {
                request.include = include.clone();
            }
            if !exclude.is_empty() {
                request.exclude = exclude.clone();
            }
            if let Some(outfile) = outfile {
                request.outfile = Some(outfile.clone());
            }

            let client = connect(cli, profile, Service::Ejbca)?;
            let path = client.export_config(&request).await?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Status => cmd_status(cli, profile).await,
        Commands::Certs { all } => cmd_certs(profile, *all),
        Commands::Enroll {
            csr,
            common_name,
            organization,
            username,
            password,
            certificate_profile,
            end_entity_profile,
            certificate_authority,
            no_chain,
            outfile,
        } => {
            let options = EnrollOptions {
                csr: csr.as_deref(),
                common_name: common_name.as_deref(),
                organization: organization.as_deref(),
                username: username.as_deref(),
                password: password.as_deref(),
                certificate_profile: certificate_profile.as_deref(),
                end_entity_profile: end_entity_profile.as_deref(),
                certificate_authority: certificate_authority.as_deref(),
                include_chain: !no_chain && profile.enroll.include_chain,
                outfile: outfile.as_deref(),
            };
            cmd_enroll(cli, profile, options).await
        }
        Commands::Sign {
            worker,
            input,
            output,
            metadata,
        } => cmd_sign(cli, profile, worker.as_deref(), input, output.as_deref(), metadata).await,
        Commands::Config { action } => cmd_config(cli, profile, action),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Service {
    Ejbca,
    SignServer,
}

fn load_profile(cli: &Cli) -> Result<AdminProfile> {
    let mut loader = ConfigLoader::new();
    if let Some(ref path) = cli.config {
        loader = loader.with_path(path);
    }
    loader.load()
}

/// Select the client certificate and build a client for `service`.
fn connect(cli: &Cli, profile: &AdminProfile, service: Service) -> Result<AdminClient> {
    let builder = match service {
        Service::Ejbca => profile.client_config_builder(cli.server.as_deref())?,
        Service::SignServer => profile.signserver_config_builder(cli.server.as_deref())?,
    };

    let store = profile.certificate_store()?;
    let serial = cli.serial.as_deref().or(profile.identity.serial.as_deref());
    let cert = select_client_certificate(&store, serial, &mut ConsolePrompt::stdio())?;
    tracing::info!(
        "Using certificate {} (serial {})",
        cert.display_name,
        cert.serial_number
    );

    AdminClient::new(builder.client_certificate(&cert)?.build()?)
}

async fn cmd_status(cli: &Cli, profile: &AdminProfile) -> Result<()> {
    let client = connect(cli, profile, Service::Ejbca)?;
    client.configdump_status().await?;
    println!(
        "Configdump endpoint is available at {}",
        client.config().server_url
    );
    Ok(())
}

fn cmd_certs(profile: &AdminProfile, all: bool) -> Result<()> {
    let store = profile.certificate_store()?;
    let certs = if all {
        store.list_certificates()?
    } else {
        store.list_client_auth_certificates()?
    };

    println!("Certificate store: {}", store.path().display());
    if certs.is_empty() {
        println!("  (no certificates)");
        return Ok(());
    }

    print!("{}", format_candidate_table(&certs));
    Ok(())
}

struct EnrollOptions<'a> {
    csr: Option<&'a Path>,
    common_name: Option<&'a str>,
    organization: Option<&'a str>,
    username: Option<&'a str>,
    password: Option<&'a str>,
    certificate_profile: Option<&'a str>,
    end_entity_profile: Option<&'a str>,
    certificate_authority: Option<&'a str>,
    include_chain: bool,
    outfile: Option<&'a Path>,
}

async fn cmd_enroll(cli: &Cli, profile: &AdminProfile, options: EnrollOptions<'_>) -> Result<()> {
    let defaults = &profile.enroll;

    let username = options
        .username
        .or(defaults.username.as_deref())
        .or(options.common_name)
        .ok_or_else(|| ClientError::config("An end entity username is required (--username)"))?
        .to_string();

    let required = |value: Option<&str>, fallback: &Option<String>, flag: &str| {
        value
            .map(str::to_string)
            .or_else(|| fallback.clone())
            .ok_or_else(|| ClientError::config(format!("{flag} is required")))
    };
    let certificate_profile = required(
        options.certificate_profile,
        &defaults.certificate_profile,
        "--certificate-profile",
    )?;
    let end_entity_profile = required(
        options.end_entity_profile,
        &defaults.end_entity_profile,
        "--end-entity-profile",
    )?;
    let certificate_authority =
        required(options.certificate_authority, &defaults.certificate_authority, "--ca")?;

    let password = match options.password {
        Some(p) => p.to_string(),
        None => std::env::var("EJBCA_ENROLL_PASSWORD").unwrap_or_default(),
    };

    let base = options
        .outfile
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&username));

    let (csr_pem, key_pem) = match options.csr {
        Some(path) => (csr_to_pem(&std::fs::read(path)?)?, None),
        None => generate_csr(options.common_name.unwrap_or(&username), options.organization)?,
    };

    let request = EnrollRequest::new(csr_pem, username)
        .certificate_profile(certificate_profile)
        .end_entity_profile(end_entity_profile)
        .certificate_authority(certificate_authority)
        .password(password)
        .include_chain(options.include_chain);

    let client = connect(cli, profile, Service::Ejbca)?;
    let enrolled = client.enroll_pkcs10(&request).await?;

    let cert_path = append_extension(&base, "pem");
    std::fs::write(&cert_path, enrolled.to_pem())?;
    println!("{}", cert_path.display());

    if let Some(key_pem) = key_pem {
        let key_path = append_extension(&base, "key");
        std::fs::write(&key_path, key_pem)?;
        println!("{}", key_path.display());
    }

    Ok(())
}

#[cfg(feature = "csr-gen")]
fn generate_csr(common_name: &str, organization: Option<&str>) -> Result<(String, Option<String>)> {
    let generated = ejbca_admin_client::csr::generate_client_csr(common_name, organization)?;
    tracing::info!("Generated a new key pair for {}", common_name);
    Ok((generated.csr_pem, Some(generated.key_pem)))
}

#[cfg(not(feature = "csr-gen"))]
fn generate_csr(_common_name: &str, _organization: Option<&str>) -> Result<(String, Option<String>)> {
    Err(ClientError::config(
        "CSR generation feature not enabled; pass --csr",
    ))
}

async fn cmd_sign(
    cli: &Cli,
    profile: &AdminProfile,
    worker: Option<&str>,
    input: &Path,
    output: Option<&Path>,
    metadata: &[String],
) -> Result<()> {
    let worker = worker
        .or(profile.signserver.worker.as_deref())
        .ok_or_else(|| ClientError::config("A worker is required (--worker)"))?;

    let mut request = SignRequest::new(&std::fs::read(input)?);
    for entry in metadata {
        let (key, value) = parse_metadata(entry)?;
        request = request.with_metadata(key, value);
    }

    let client = connect(cli, profile, Service::SignServer)?;
    let response = client.sign(worker, &request).await?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| append_extension(input, "signed"));
    std::fs::write(&output, response.decoded_data()?)?;
    println!("{}", output.display());
    Ok(())
}

fn cmd_config(cli: &Cli, profile: &AdminProfile, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut loader = ConfigLoader::new();
            if let Some(ref path) = cli.config {
                loader = loader.with_path(path);
            }
            match loader.find_config_file()? {
                Some(path) => println!("# Loaded from {}", path.display()),
                None => println!("# No profile file found; built-in defaults"),
            }
            print!("{}", profile.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { path, force } => {
            let path = path
                .clone()
                .or_else(|| cli.config.clone())
                .or_else(default_config_path)
                .ok_or_else(|| {
                    ClientError::config("Unable to determine the user config directory")
                })?;
            write_default_config(&path, *force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
