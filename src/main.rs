//! acer-ec - embedded controller control tool
//!
//! Thin shell over the `acer_ec` library: parses flags, acquires the
//! I/O ports once, then runs the requested actions in order.

use std::env;
use std::process;

use acer_ec::registers::{
    Field, BACKLIGHT, BLUETOOTH, KBD_BACKLIGHT, TOUCHPAD, WIRELESS, WWAN,
};
use acer_ec::{
    status, Ec, EcTransport, Error, IoPorts, Reporter, Status, TransportError, COMMAND_PORT,
    DATA_PORT,
};

const USAGE: &str = "\
Usage: acer-ec [OPTIONS]

With no options, prints the status summary.

  -s, --status              print a status summary
  -w, --wireless [on|off]   toggle or set the wireless radio
  -b, --bluetooth [on|off]  toggle or set the bluetooth radio
  -3, --3g [on|off]         toggle or set the 3G radio
  -t, --touchpad [on|off]   toggle or set the touchpad
  -k, --kbd-light [on|off]  toggle or set the keyboard backlight
  -l, --brightness <0-9>    set the LCD backlight level
  -g, --get <register>      read a register (0-255), print its value
  -d, --dump-hex            dump all registers in hexadecimal
  -r, --dump-dec            dump all registers in decimal
  -f, --fields              dump every named field with its value
  -q, --quiet               suppress change announcements
  -v, --version             print the version
  -h, --help                print this help";

enum Action {
    Toggle {
        field: &'static Field,
        name: &'static str,
        set: Option<bool>,
    },
    Brightness(u32),
    Get(u16),
    DumpHex,
    DumpDec,
    Fields,
    Status,
}

fn main() {
    env_logger::init();
    process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut actions = Vec::new();
    let mut quiet = false;
    let mut informational = false;

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-q" | "--quiet" => quiet = true,
            "-s" | "--status" => actions.push(Action::Status),
            "-w" | "--wireless" => actions.push(toggle(&WIRELESS, "Wireless", &mut iter)),
            "-b" | "--bluetooth" => actions.push(toggle(&BLUETOOTH, "Bluetooth", &mut iter)),
            "-3" | "--3g" => actions.push(toggle(&WWAN, "3G", &mut iter)),
            "-t" | "--touchpad" => actions.push(toggle(&TOUCHPAD, "Touchpad", &mut iter)),
            "-k" | "--kbd-light" => {
                actions.push(toggle(&KBD_BACKLIGHT, "Keyboard backlight", &mut iter));
            }
            "-l" | "--brightness" => {
                let Some(level) = iter.next().and_then(|v| v.parse::<u32>().ok()) else {
                    eprintln!("acer-ec: -l needs a numeric level");
                    return 1;
                };
                actions.push(Action::Brightness(level));
            }
            "-g" | "--get" => {
                let Some(register) = iter.next().and_then(|v| v.parse::<u16>().ok()) else {
                    eprintln!("acer-ec: -g needs a numeric register index");
                    return 1;
                };
                actions.push(Action::Get(register));
            }
            "-d" | "--dump-hex" => actions.push(Action::DumpHex),
            "-r" | "--dump-dec" => actions.push(Action::DumpDec),
            "-f" | "--fields" => actions.push(Action::Fields),
            "-v" | "--version" => {
                println!("acer-ec {}", env!("CARGO_PKG_VERSION"));
                informational = true;
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                informational = true;
            }
            other => {
                eprintln!("acer-ec: unknown option '{other}'");
                eprintln!("{USAGE}");
                return 1;
            }
        }
    }

    if actions.is_empty() {
        if informational {
            return 0;
        }
        actions.push(Action::Status);
    }

    let ports = match IoPorts::acquire(&[COMMAND_PORT, DATA_PORT]) {
        Ok(ports) => ports,
        Err(err) => {
            eprintln!("acer-ec: {err}");
            return 1;
        }
    };
    let mut ec = Ec::new(EcTransport::default(ports));
    let reporter = Reporter::new(quiet);

    for action in &actions {
        if let Err(err) = perform(&mut ec, &reporter, action) {
            eprintln!("acer-ec: {err}");
            return 1;
        }
    }
    0
}

fn toggle(
    field: &'static Field,
    name: &'static str,
    iter: &mut std::iter::Peekable<std::slice::Iter<'_, String>>,
) -> Action {
    let set = match iter.peek().map(|v| v.as_str()) {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    };
    if set.is_some() {
        iter.next();
    }
    Action::Toggle { field, name, set }
}

fn perform(
    ec: &mut Ec<EcTransport<IoPorts>>,
    reporter: &Reporter,
    action: &Action,
) -> Result<(), Error<TransportError>> {
    match action {
        Action::Toggle { field, name, set } => {
            let on = match set {
                Some(value) => {
                    ec.write_flag(field, *value)?;
                    *value
                }
                None => ec.toggle_flag(field)?,
            };
            reporter.announce(name, on);
        }
        Action::Brightness(level) => {
            ec.write_level(&BACKLIGHT, *level)?;
        }
        Action::Get(register) => {
            println!("{}", ec.read_raw(*register)?);
        }
        Action::DumpHex => {
            let registers = ec.snapshot()?;
            print!("{}", status::format_hex_grid(&registers));
        }
        Action::DumpDec => {
            let registers = ec.snapshot()?;
            print!("{}", status::format_dec_grid(&registers));
        }
        Action::Fields => {
            print!("{}", status::format_fields(ec)?);
        }
        Action::Status => {
            print!("{}", Status::read(ec)?);
        }
    }
    Ok(())
}
