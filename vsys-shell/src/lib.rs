use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vsys_contract::{
    Contract, DataEntry, TemplateVariant, TypeTag, decode_list, encode_list, token_id,
    token_template,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Inspect and build VSYS contract bytes", long_about = None)]
pub struct Args {
    /// Log filter, e.g. `debug` or `vsys_contract=trace` (defaults to RUST_LOG)
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a token contract template as hex
    Template {
        /// Use the template with the `split` function
        #[arg(short = 's', long = "split")]
        split: bool,

        /// Print a JSON summary of each section instead of raw hex
        #[arg(long = "json")]
        json: bool,
    },

    /// Decode contract bytes and list their functions
    Inspect {
        /// Contract bytes as hex
        #[arg(value_name = "HEX", required_unless_present = "file", conflicts_with = "file")]
        hex: Option<String>,

        /// Read the hex contract from a file
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,

        /// Print a JSON summary instead of the listing
        #[arg(long = "json")]
        json: bool,
    },

    /// Decode a hex data stack, one entry per line
    DecodeData {
        #[arg(value_name = "HEX")]
        hex: String,
    },

    /// Encode `Type:value` arguments as a hex data stack
    EncodeData {
        #[arg(value_name = "TYPE:VALUE", required = true)]
        values: Vec<String>,
    },

    /// Derive the hex token id for a token index of a contract
    TokenId {
        /// 26-byte contract id as hex
        #[arg(value_name = "CONTRACT_ID")]
        contract_id: String,

        #[arg(value_name = "INDEX", default_value_t = 0)]
        index: u32,
    },
}

/// Install the stderr subscriber. An explicit level wins over `RUST_LOG`.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Run one command and return what should be printed
pub fn run(command: &Command) -> Result<String> {
    tracing::debug!(?command, "running command");
    match command {
        Command::Template { split, json } => template(*split, *json),
        Command::Inspect { hex, file, json } => {
            let text = match (hex, file) {
                (Some(hex), _) => hex.clone(),
                (None, Some(path)) => read_hex_file(path)?,
                (None, None) => bail!("either HEX or --file is required"),
            };
            let bytes = decode_hex(&text)?;
            if *json {
                let contract = Contract::from_bytes(&bytes).context("failed to parse contract")?;
                Ok(serde_json::to_string_pretty(&contract.summary())?)
            } else {
                inspect(&bytes)
            }
        }
        Command::DecodeData { hex } => decode_data(hex),
        Command::EncodeData { values } => encode_data(values),
        Command::TokenId { contract_id, index } => derive_token_id(contract_id, *index),
    }
}

pub fn template(split: bool, json: bool) -> Result<String> {
    let variant = if split {
        TemplateVariant::WithSplit
    } else {
        TemplateVariant::WithoutSplit
    };
    let contract = token_template(variant)
        .with_context(|| format!("failed to build {} template", variant.name()))?;

    if json {
        Ok(serde_json::to_string_pretty(&contract.summary())?)
    } else {
        Ok(hex::encode(contract.to_bytes()?))
    }
}

/// Render contract bytes as a readable listing
pub fn inspect(bytes: &[u8]) -> Result<String> {
    let contract = Contract::from_bytes(bytes).context("failed to parse contract")?;
    let names = contract
        .textual_names()
        .context("failed to decode textual section")?;

    let mut out = String::new();
    writeln!(
        out,
        "language: {} v{}",
        contract.language_code(),
        contract.language_version()
    )?;

    for (title, functions, textual) in [
        ("triggers", contract.triggers()?, &names.triggers),
        ("descriptors", contract.descriptors()?, &names.descriptors),
    ] {
        writeln!(out, "{title}:")?;
        for (index, function) in functions.iter().enumerate() {
            let name = textual
                .get(index)
                .map_or("?", |names| names.name.as_str());
            write!(out, "  {name}: {function}")?;
        }
    }

    writeln!(out, "state variables:")?;
    for (index, var) in contract.state_variables()?.iter().enumerate() {
        let name = names.state_variables.get(index).map_or("?", String::as_str);
        writeln!(out, "  {}: {name} {}", var.index, var.tag)?;
    }
    match &names.state_maps {
        Some(maps) if maps.is_empty() => writeln!(out, "state maps: none")?,
        Some(maps) => writeln!(out, "state maps: {}", maps.join(", "))?,
        None => {}
    }
    Ok(out.trim_end().to_string())
}

pub fn decode_data(hex: &str) -> Result<String> {
    let bytes = decode_hex(hex)?;
    let entries = decode_list(&bytes).context("failed to decode data stack")?;
    Ok(entries
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("{index}: {entry}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn encode_data<S: AsRef<str>>(values: &[S]) -> Result<String> {
    let entries = values
        .iter()
        .map(|value| parse_entry(value.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(hex::encode(encode_list(&entries)?))
}

pub fn derive_token_id(contract_id: &str, index: u32) -> Result<String> {
    let id = token_id(&decode_hex(contract_id)?, index)
        .with_context(|| format!("cannot derive token {index}"))?;
    Ok(hex::encode(id))
}

/// Parse one `Type:value` argument. Fixed-width byte types take hex.
pub fn parse_entry(arg: &str) -> Result<DataEntry> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("expected TYPE:VALUE, got {arg:?}"))?;
    let tag = TypeTag::from_name(name)?;

    let entry = match tag {
        TypeTag::Amount => DataEntry::amount(parse_scalar(tag, value)?),
        TypeTag::Timestamp => DataEntry::timestamp(parse_scalar(tag, value)?),
        TypeTag::Balance => DataEntry::balance(parse_scalar(tag, value)?),
        TypeTag::Int32 => DataEntry::int32(parse_scalar(tag, value)?),
        TypeTag::Boolean => DataEntry::boolean(parse_scalar(tag, value)?),
        TypeTag::ShortText => DataEntry::short_text(value),
        TypeTag::PublicKey => DataEntry::public_key(&decode_hex(value)?),
        TypeTag::Address => DataEntry::address(&decode_hex(value)?),
        TypeTag::ContractAccount => DataEntry::contract_account(&decode_hex(value)?),
        TypeTag::TokenId => DataEntry::token_id(&decode_hex(value)?),
        TypeTag::Account => bail!("{tag} is a prototype-only type and takes no value"),
    };
    entry.with_context(|| format!("invalid argument {arg:?}"))
}

fn parse_scalar<T>(tag: TypeTag, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("{value:?} is not a valid {tag}"))
}

fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).with_context(|| format!("invalid hex input of {} chars", text.len()))
}

fn read_hex_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(text.split_whitespace().collect())
}
