//! CLI tool for xlsign - loads a workbook, optionally signs it, and prints
//! the active worksheet's shapes as JSON
//!
//! Usage:
//!   xlsign_cli <input.xlsx|url>                          # Shapes JSON to stdout
//!   xlsign_cli <input.xlsx|url> --cell R5C3 --sign sig.png
//!   xlsign_cli <input.xlsx|url> --cell C5 --clear -o out.json

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use xlsign::{
    CellAddress, HttpFetcher, ImagePayload, LoadCompletion, SignatureViewer,
};

const USAGE: &str =
    "Usage: xlsign_cli <input.xlsx|url> [--cell R5C3|C5] [--sign <image>] [--clear] [-o output.json]";

struct Args {
    input: String,
    cell: Option<String>,
    sign: Option<String>,
    clear: bool,
    output: Option<String>,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut parsed = Args {
        input: String::new(),
        cell: None,
        sign: None,
        clear: false,
        output: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cell" => parsed.cell = Some(args.next().unwrap_or_else(|| fail(USAGE))),
            "--sign" => parsed.sign = Some(args.next().unwrap_or_else(|| fail(USAGE))),
            "--clear" => parsed.clear = true,
            "-o" => parsed.output = Some(args.next().unwrap_or_else(|| fail(USAGE))),
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            _ if parsed.input.is_empty() => parsed.input = arg,
            _ => fail(USAGE),
        }
    }

    if parsed.input.is_empty() {
        fail(USAGE);
    }
    parsed
}

/// Accept either R1C1 or A1 notation.
fn parse_cell(reference: &str) -> CellAddress {
    CellAddress::parse_r1c1(reference)
        .or_else(|_| CellAddress::parse_a1(reference))
        .unwrap_or_else(|e| fail(&format!("Error: {e}")))
}

fn main() {
    let args = parse_args();

    let fetcher = HttpFetcher::new().unwrap_or_else(|e| fail(&format!("Error: {e}")));
    let mut viewer = SignatureViewer::new();

    match viewer.load_blocking(&args.input, &fetcher) {
        Some(LoadCompletion::Attached) => {}
        Some(LoadCompletion::Failed(message)) => {
            fail(&format!("Error loading {}: {message}", args.input))
        }
        other => fail(&format!("Error loading {}: {other:?}", args.input)),
    }

    if let Some(cell) = &args.cell {
        let address = parse_cell(cell);
        viewer.set_active_cell(address.row, address.col);
    }

    if let Some(image_path) = &args.sign {
        let bytes = match fs::read(image_path) {
            Ok(b) => b,
            Err(e) => fail(&format!("Error reading {image_path}: {e}")),
        };
        let ext = Path::new(image_path).extension().and_then(|e| e.to_str());
        let data_url = ImagePayload::from_bytes(&bytes, ext).to_data_url();

        viewer.open_signature_dialog();
        if let Some(outcome) = viewer.confirm_signature_with(&data_url) {
            eprintln!("{outcome:?}");
        }
    }

    if args.clear {
        eprintln!("{:?}", viewer.clear_signature());
    }

    let json = match viewer.shapes_json() {
        Ok(j) => j,
        Err(e) => fail(&format!("Error serializing JSON: {e}")),
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                fail(&format!("Error writing {path}: {e}"));
            }
            eprintln!("Written: {path}");
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
