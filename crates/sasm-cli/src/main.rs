//! SASM command-line runner.
//!
//! Usage:
//!   sasm <file.sasm>      Run a program file (one instruction per line)
//!   sasm -e <code>        Run inline source (newline-separated lines)
//!   sasm --demo <name>    Run a built-in demo program
//!   sasm --opcodes        List the instruction catalogue
//!   sasm                  Read a program from stdin

mod demos;

use std::{
    env, fs,
    io::{self, Read},
    process::ExitCode,
};

use sasm_vm::{Machine, Opcode, Outcome};

const USAGE: &str = "\
Usage: sasm [OPTIONS] [FILE]

Arguments:
  [FILE]  SASM program file to run (one instruction per line)

Options:
  -e <CODE>      Run CODE (newline-separated instruction lines)
  --demo <NAME>  Run a built-in demo: product, sum, sqrt
  --opcodes      List the instruction catalogue
  -h, --help     Print this help message

If no arguments are given, reads a program from stdin.";

fn read_stdin() -> Result<String, io::Error> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

enum Action {
    Run(Vec<String>),
    Opcodes,
    Help,
}

fn parse_args() -> Result<Action, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [] => Ok(Action::Run(to_lines(
            &read_stdin().map_err(|e| format!("error reading stdin: {e}"))?,
        ))),
        [arg] if arg == "-" => Ok(Action::Run(to_lines(
            &read_stdin().map_err(|e| format!("error reading stdin: {e}"))?,
        ))),
        [arg] if arg == "-h" || arg == "--help" => Ok(Action::Help),
        [arg] if arg == "--opcodes" => Ok(Action::Opcodes),
        [flag, code] if flag == "-e" => Ok(Action::Run(to_lines(code))),
        [flag, name] if flag == "--demo" => {
            let program = demos::by_name(name).ok_or_else(|| {
                format!(
                    "unknown demo '{name}' (available: {})",
                    demos::NAMES.join(", ")
                )
            })?;
            Ok(Action::Run(program.iter().map(|s| s.to_string()).collect()))
        }
        [file] => Ok(Action::Run(to_lines(
            &fs::read_to_string(file).map_err(|e| format!("error reading {file}: {e}"))?,
        ))),
        _ => Err(USAGE.into()),
    }
}

fn to_lines(source: &str) -> Vec<String> {
    source.lines().map(String::from).collect()
}

fn run(lines: Vec<String>) -> ExitCode {
    let mut machine = Machine::new();
    machine.load_program(lines);
    match machine.run() {
        Ok(outcome) => {
            if outcome == Outcome::CycleLimit {
                eprintln!("warning: cycle bound exhausted after {} cycles", machine.cycle());
            } else {
                log::debug!("completed in {} cycles", machine.cycle());
            }
            for value in machine.stack() {
                println!("{value}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error at line {}: {e}", machine.ip() + 1);
            ExitCode::FAILURE
        }
    }
}

fn print_opcodes() {
    for op in Opcode::ALL {
        println!("{:6} {}", op.as_str(), op.description());
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match parse_args() {
        Ok(Action::Help) => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Action::Opcodes) => {
            print_opcodes();
            ExitCode::SUCCESS
        }
        Ok(Action::Run(lines)) => run(lines),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
