//! # OLSR Dump
//!
//! Command-line tool to decode hex-encoded OLSR packets.

use std::net::Ipv4Addr;
use std::process::ExitCode;

use bytes::Bytes;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use olsr_wire::{
    Association, CodecConfig, Hello, Hna, LinkMessage, MessageHeader, Mid, PacketDecoder,
    PacketEncoder, Payload, Quantum, Tc, WireResult,
};

/// Decode OLSR packets from hex
#[derive(Parser, Debug)]
#[command(name = "olsr_dump")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Packet bytes as hex; whitespace and a 0x prefix are ignored
    #[arg(required_unless_present = "encode_demo")]
    hex: Vec<String>,

    /// Codec configuration file (TOML)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Print the hex of a sample packet instead of decoding
    #[arg(long)]
    encode_demo: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn decode_hex(s: &str) -> Result<Vec<u8>, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let digits: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits: {}", digits.len()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text: String = pair.iter().collect();
            u8::from_str_radix(&text, 16).map_err(|e| format!("invalid hex {text:?}: {e}"))
        })
        .collect()
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn demo_messages() -> WireResult<Vec<MessageHeader>> {
    let origin = Ipv4Addr::new(10, 1, 1, 1);
    let payloads: Vec<Payload> = vec![
        Hello::new(
            Quantum::from_seconds(2.0)?,
            Hello::WILL_DEFAULT,
            vec![LinkMessage::new(6, vec![Ipv4Addr::new(10, 1, 1, 2)])],
        )
        .into(),
        Tc::new(1, vec![Ipv4Addr::new(10, 1, 1, 2)]).into(),
        Mid::new(vec![Ipv4Addr::new(10, 2, 1, 1)]).into(),
        Hna::new(vec![Association::with_prefix(Ipv4Addr::new(192, 168, 0, 0), 16)]).into(),
    ];

    let mut messages = Vec::with_capacity(4);
    for (seq, payload) in (1u16..).zip(payloads) {
        let mut msg = MessageHeader::new(payload);
        msg.set_vtime_seconds(6.0)?;
        msg.originator_address = origin;
        msg.time_to_live = 255;
        msg.message_sequence_number = seq;
        messages.push(msg);
    }
    Ok(messages)
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => CodecConfig::from_toml_file(path).map_err(|e| e.to_string())?,
        None => CodecConfig::default(),
    };

    if cli.encode_demo {
        let messages = demo_messages().map_err(|e| e.to_string())?;
        let bytes = PacketEncoder::new(config)
            .and_then(|mut encoder| encoder.encode_messages(1, &messages))
            .map_err(|e| e.to_string())?;
        println!("{}", encode_hex(&bytes));
        return Ok(());
    }

    let raw = decode_hex(&cli.hex.join(""))?;
    tracing::debug!(bytes = raw.len(), "decoding input");

    let mut buf = Bytes::from(raw);
    let mut decoder = PacketDecoder::new(config).map_err(|e| e.to_string())?;
    while !buf.is_empty() {
        let packet = decoder.decode(&mut buf).map_err(|e| e.to_string())?;
        println!("{packet}");
    }

    let stats = decoder.stats();
    tracing::info!(
        packets = stats.packets,
        messages = stats.messages,
        skipped = stats.skipped_messages,
        residue = stats.residue_bytes,
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
        EnvFilter::new(format!("olsr_wire={level},olsr_dump={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
