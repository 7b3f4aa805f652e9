//! Build script for pinguard-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates the board pin table (`board_pins.rs`) into OUT_DIR

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pinguard_core::config::{parse_pin_string, PinAssignment, PinMap};
use pinguard_core::{PinDirection, PinOwner, PinPlatform, PinRegistry, PinRequest};
use pinguard_hal::Rp2040;

/// One parsed pin entry
struct PinEntry {
    pin: u8,
    direction: PinDirection,
    inverted: bool,
    pull_up: bool,
}

/// One parsed owner section
struct OwnerEntry {
    owner: PinOwner,
    pins: Vec<PinEntry>,
    channels: u8,
}

fn main() {
    setup_linker();
    let (board, owners) = validate_config();
    generate_board_pins(&board, &owners);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Linker scripts for cortex-m-rt, the RP2040 boot section and defmt
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Fail the build with a boxed error list
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate board.toml and return the board name and owner sections
fn validate_config() -> (String, Vec<OwnerEntry>) {
    // Re-run if board.toml changes
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    if !config_path.exists() {
        fail(
            "board.toml not found!",
            &["The firmware requires a board.toml pin map next to Cargo.toml".to_string()],
        );
    }

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| fail("Failed to read board.toml", &[e.to_string()]));

    let config: toml::Value = toml::from_str(&content).unwrap_or_else(|e| {
        let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
        fail("Invalid TOML syntax in board.toml", &lines)
    });

    let board = match config.get("board") {
        Some(toml::Value::String(name)) => name.clone(),
        _ => fail("Missing board name", &["board = \"rp2040\" is required".to_string()]),
    };
    if board != Rp2040.name() {
        fail(
            "Unsupported board",
            &[format!("'{}' is not supported by this firmware", board)],
        );
    }

    let owners = parse_owners(&config);
    validate_pin_map(&owners);

    println!("cargo:warning=board.toml validated successfully");
    (board, owners)
}

/// Parse every [owner.*] section
fn parse_owners(config: &toml::Value) -> Vec<OwnerEntry> {
    let sections = match config.get("owner") {
        Some(toml::Value::Table(t)) => t,
        _ => fail(
            "Missing required sections in board.toml",
            &["Missing [owner.*] section - at least one owner is required".to_string()],
        ),
    };

    let mut errors = Vec::new();
    let mut owners = Vec::new();

    for (name, section) in sections {
        let Some(owner) = PinOwner::parse(name) else {
            errors.push(format!("[owner.{}] unknown owner name", name));
            continue;
        };
        let Some(section) = section.as_table() else {
            errors.push(format!("[owner.{}] must be a table", name));
            continue;
        };

        let mut pins = Vec::new();
        match section.get("pins") {
            Some(toml::Value::Array(entries)) => {
                for (i, entry) in entries.iter().enumerate() {
                    let pin = entry.get("pin").and_then(|p| p.as_str());
                    let dir = entry.get("dir").and_then(|d| d.as_str());
                    let (Some(pin), Some(dir)) = (pin, dir) else {
                        errors.push(format!("[owner.{}] pin {} needs 'pin' and 'dir'", name, i));
                        continue;
                    };
                    let Some(direction) = PinDirection::parse(dir) else {
                        errors.push(format!("[owner.{}] pin {} dir must be 'in' or 'out'", name, i));
                        continue;
                    };
                    match parse_pin_string(pin) {
                        Ok(Some(config)) => pins.push(PinEntry {
                            pin: config.pin,
                            direction,
                            inverted: config.inverted,
                            pull_up: config.pull_up,
                        }),
                        // Unassigned optional pin
                        Ok(None) => {}
                        Err(_) => {
                            errors.push(format!("[owner.{}] invalid pin '{}'", name, pin));
                        }
                    }
                }
            }
            Some(_) => errors.push(format!("[owner.{}] pins must be an array", name)),
            None => errors.push(format!("[owner.{}] missing 'pins'", name)),
        }

        let channels = match section.get("channels") {
            None => 0,
            Some(toml::Value::Integer(n)) if (0..=Rp2040::CHANNEL_COUNT as i64).contains(n) => {
                *n as u8
            }
            Some(_) => {
                errors.push(format!(
                    "[owner.{}] channels must be 0-{}",
                    name,
                    Rp2040::CHANNEL_COUNT
                ));
                0
            }
        };

        owners.push(OwnerEntry {
            owner,
            pins,
            channels,
        });
    }

    if !errors.is_empty() {
        fail("Invalid owner configuration", &errors);
    }
    owners
}

/// Run the same validation the firmware runs at boot
fn validate_pin_map(owners: &[OwnerEntry]) {
    let registry = PinRegistry::new(Rp2040);
    let mut map = PinMap::new();
    let mut errors = Vec::new();

    for entry in owners {
        let mut assignment = PinAssignment::new(entry.owner).with_channels(entry.channels);
        for pin in &entry.pins {
            if let Err(e) = assignment.push(PinRequest::new(pin.pin, pin.direction)) {
                errors.push(format!("{:?}: {}", entry.owner, e));
            }
        }
        if let Err(e) = map.push(assignment) {
            errors.push(e.to_string());
        }
    }

    if let Err(e) = map.validate(&registry) {
        errors.push(e.to_string());
    }

    if !errors.is_empty() {
        fail("Invalid pin map", &errors);
    }
}

/// Write board_pins.rs with the parsed table
fn generate_board_pins(board: &str, owners: &[OwnerEntry]) {
    let mut output = String::new();

    output.push_str("// Auto-generated from board.toml - DO NOT EDIT\n");
    output.push_str("// Generated at build time by build.rs\n\n");

    output.push_str("/// Board name from board.toml\n");
    output.push_str(&format!("pub const BOARD_NAME: &str = {:?};\n\n", board));

    output.push_str("/// (owner wire value, channel count, [(pin, output, inverted, pull_up)])\n");
    output.push_str("pub const PIN_ASSIGNMENTS: &[(u8, u8, &[(u8, bool, bool, bool)])] = &[\n");
    for entry in owners {
        let pins = entry
            .pins
            .iter()
            .map(|p| {
                format!(
                    "({}, {}, {}, {})",
                    p.pin,
                    p.direction.is_output(),
                    p.inverted,
                    p.pull_up
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!(
            "    ({:#04x}, {}, &[{}]), // {:?}\n",
            entry.owner.to_u8(),
            entry.channels,
            pins,
            entry.owner
        ));
    }
    output.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let pins_path = PathBuf::from(out_dir).join("board_pins.rs");
    let mut file = File::create(&pins_path).expect("Failed to create board_pins.rs");
    file.write_all(output.as_bytes())
        .expect("Failed to write board_pins.rs");
}
