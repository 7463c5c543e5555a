//! Hash a password for the users file.
//!
//! Reads the password from the first line of stdin and prints an Argon2id PHC
//! string suitable for the `passwordHash` field. There is no command-line flag
//! for the password, so it never shows up in shell history or `ps` output.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, BufRead};

use clap::Parser;
use workouttracker::outbound::credentials::hash_password;
use zeroize::Zeroize;

/// `hash-password` command arguments. Only `--help` and `--version`.
#[derive(Parser)]
#[command(
    name = "hash-password",
    about = "Produce an Argon2id hash for a workouttracker users file entry",
    long_about = "Produce an Argon2id hash for a workouttracker users file entry.\n\n\
                  The password is read from the first line of stdin, e.g.\n\
                  `read -rs PW && printf '%s\\n' \"$PW\" | hash-password`.",
    version
)]
struct CliArgs {}

fn read_first_line(mut input: impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(line)
}

fn main() -> io::Result<()> {
    CliArgs::parse();
    let mut password = read_first_line(io::stdin().lock())?;
    if password.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "password must not be empty",
        ));
    }

    let hashed = hash_password(&password).map_err(io::Error::other);
    password.zeroize();
    println!("{}", hashed?);
    Ok(())
}
