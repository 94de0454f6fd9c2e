//! Command line front end for the field data codec
//!
//! Runs the same validation the web forms run, for scripting and for checking
//! what a token will be submitted as.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;

use tpf2_fielddata::codec::{decode_with, encode_register_with, encode_with, HexPayload};
use tpf2_fielddata::field_list::{parse_field_list_with, parse_record_id};
use tpf2_fielddata::wire::{decode_base64_field_with, decode_test_data_with};
use tpf2_fielddata::{CodecConfig, FieldCatalog};

const USAGE: &str = "\
Usage: tpf2-fielddata [--config <file>] <command> [args]

Commands:
  encode <token>                 Encode a field data token to hex
  encode-reg <token>             Encode a token for a register slot
  decode <base64>                Decode a base64 payload
  decode-hex <hex>               Decode a hex payload
  fields <list> --catalog <file> [--macro <name>]
                                 Validate and encode FIELD:DATA,... pairs
  test-data <file>               Decode a test data JSON document
  rec-id <hex>                   Convert a hex record id or ordinal to its integer
";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<()> {
    let mut config_path: Option<PathBuf> = None;
    let mut catalog_path: Option<PathBuf> = None;
    let mut macro_name: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(option_value(&args, i, "--config")?));
                i += 1;
            }
            "--catalog" => {
                catalog_path = Some(PathBuf::from(option_value(&args, i, "--catalog")?));
                i += 1;
            }
            "--macro" | "-m" => {
                macro_name = Some(option_value(&args, i, "--macro")?.to_string());
                i += 1;
            }
            "--help" | "-h" => {
                print!("{USAGE}");
                return Ok(());
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::load_or_default(),
    };
    debug!("Using register width of {} bits", config.reg_bits);

    let (command, rest) = positional
        .split_first()
        .ok_or_else(|| anyhow!("missing command\n\n{USAGE}"))?;

    match command.as_str() {
        "encode" => {
            println!("{}", encode_with(single_arg(rest, "token")?, &config)?);
        }
        "encode-reg" => {
            println!("{}", encode_register_with(single_arg(rest, "token")?, &config)?);
        }
        "decode" => {
            let decoded = decode_base64_field_with(single_arg(rest, "base64 payload")?, &config)?;
            println!("{}", serde_json::to_string(&decoded)?);
        }
        "decode-hex" => {
            let payload = HexPayload::parse(single_arg(rest, "hex payload")?)?;
            println!("{}", serde_json::to_string(&decode_with(&payload.to_bytes(), &config))?);
        }
        "fields" => {
            let path = catalog_path.ok_or_else(|| anyhow!("fields requires --catalog <file>"))?;
            let catalog = FieldCatalog::load(&path)?;
            let list = parse_field_list_with(single_arg(rest, "field list")?, macro_name.as_deref(), &catalog, &config)?;
            println!("{}", serde_json::to_string_pretty(&list.to_wire())?);
        }
        "test-data" => {
            let document = read_json(Path::new(single_arg(rest, "file")?))?;
            println!("{}", serde_json::to_string_pretty(&decode_test_data_with(document, &config)?)?);
        }
        "rec-id" => {
            println!("{}", parse_record_id(single_arg(rest, "record id")?)?);
        }
        other => bail!("unknown command '{other}'\n\n{USAGE}"),
    }
    Ok(())
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{name} requires a value"))
}

fn single_arg<'a>(rest: &'a [String], what: &str) -> Result<&'a str> {
    match rest {
        [value] => Ok(value.as_str()),
        [] => bail!("missing {what}"),
        _ => bail!("expected a single {what}; quote values containing spaces"),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
