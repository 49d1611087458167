//! rsacryptor: encrypt text under an RSA public key, decrypt it with a
//! password-protected private key.
//!
//! Usage:
//!   rsacryptor encrypt --public-key cert.pem [TEXT]
//!   rsacryptor decrypt --private-key key.pem [TEXT]
//!   rsacryptor inspect --public-key cert.pem
//!
//! TEXT is read from stdin when omitted. Results go to stdout, logs to stderr.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rsacryptor::loader::load_public_key;
use rsacryptor::rsa::max_plaintext_per_block;
use rsacryptor::{CryptorConfig, Encryptor, KeySize, PaddingScheme, RsaCryptor};
#[cfg(feature = "decrypt")]
use rsacryptor::Decryptor;
use tracing::info;
#[cfg(feature = "decrypt")]
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(name = "rsacryptor", version, about = "RSA string encryption with block chunking")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RSACRYPTOR_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, global = true, env = "RSACRYPTOR_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt TEXT (or stdin, minus one trailing newline) to a base64 string
    Encrypt {
        /// Public key: X.509 certificate, SubjectPublicKeyInfo or PKCS#1, PEM or DER
        #[arg(long, short = 'k')]
        public_key: PathBuf,

        #[arg(long, default_value = "pkcs1")]
        padding: Padding,

        text: Option<String>,
    },

    /// Decrypt a base64 string produced by `encrypt`
    #[cfg(feature = "decrypt")]
    Decrypt {
        /// Password-protected PKCS#8 private key, PEM or DER
        #[arg(long, short = 'k')]
        private_key: PathBuf,

        /// Private key password; prompted for when not given
        #[arg(long, env = "RSACRYPTOR_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long, default_value = "pkcs1")]
        padding: Padding,

        text: Option<String>,
    },

    /// Print the block geometry of a public key
    Inspect {
        #[arg(long, short = 'k')]
        public_key: PathBuf,

        #[arg(long, default_value = "pkcs1")]
        padding: Padding,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Padding {
    /// PKCS#1 v1.5
    Pkcs1,
    /// OAEP with SHA-256 and MGF1-SHA-256
    OaepSha256,
}

impl From<Padding> for PaddingScheme {
    fn from(padding: Padding) -> Self {
        match padding {
            Padding::Pkcs1 => PaddingScheme::Pkcs1v15,
            Padding::OaepSha256 => PaddingScheme::OaepSha256,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log, &cli.log_format);

    match cli.command {
        Command::Encrypt {
            public_key,
            padding,
            text,
        } => {
            let plaintext = match text {
                Some(text) => text,
                None => {
                    let mut input = read_stdin()?;
                    strip_newline(&mut input);
                    input
                }
            };

            let cryptor = RsaCryptor::new(CryptorConfig::new().with_padding(padding.into()));
            let transport = cryptor
                .encrypt_string(&plaintext, &public_key)
                .with_context(|| format!("encrypting with {}", public_key.display()))?;
            println!("{transport}");
        }

        #[cfg(feature = "decrypt")]
        Command::Decrypt {
            private_key,
            password,
            padding,
            text,
        } => {
            let transport = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            let password = match password {
                Some(password) => Zeroizing::new(password),
                None => Zeroizing::new(
                    rpassword::prompt_password("Private key password: ")
                        .context("reading password")?,
                ),
            };

            let cryptor = RsaCryptor::new(CryptorConfig::new().with_padding(padding.into()));
            let plaintext = Zeroizing::new(
                cryptor
                    .decrypt_string(transport.trim(), &private_key, &password)
                    .with_context(|| format!("decrypting with {}", private_key.display()))?,
            );
            println!("{}", plaintext.as_str());
        }

        Command::Inspect {
            public_key,
            padding,
        } => {
            let key = load_public_key(&public_key)
                .with_context(|| format!("loading {}", public_key.display()))?;
            let padding = PaddingScheme::from(padding);
            info!(path = %public_key.display(), "inspected public key");

            println!("modulus bits:            {}", key.bit_length());
            println!("block size:              {} bytes", key.block_size());
            println!(
                "max plaintext per block: {} bytes ({})",
                max_plaintext_per_block(&key, padding),
                padding.name()
            );
        }
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;
    Ok(input)
}

fn strip_newline(input: &mut String) {
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries only the result
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}
