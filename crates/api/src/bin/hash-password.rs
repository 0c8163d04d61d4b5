#!/usr/bin/env cargo
//! Password hashing utility for Assistly
//!
//! Hashes a password with the algorithm and cost configured for the server
//! (`PASSWORD_ALGORITHM`, `PASSWORD_HASH_COST`, ...), for seeding accounts
//! by hand without exposing the plaintext.
//!
//! Usage:
//!   cargo run --bin hash-password
//!   cargo run --bin hash-password "MySecurePassword123!"

use std::env;
use std::io::{self, Write};

use assistly_api::{
    auth::{validate_password, PasswordHasher},
    Config,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let password = if let Some(pwd) = env::args().nth(1) {
        pwd
    } else {
        // Read password from stdin (doesn't show in process list)
        print!("Enter password to hash: ");
        io::stdout().flush()?;

        let mut password = String::new();
        io::stdin().read_line(&mut password)?;
        password.trim_end_matches(['\r', '\n']).to_string()
    };

    if let Err(e) = validate_password(&password) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let hasher = PasswordHasher::new(config.password_algorithm);
    let password_hash = hasher.hash(&password)?;

    println!("\n===========================================");
    println!("Password Hash ({:?}):", hasher.algorithm());
    println!("===========================================");
    println!("{}", password_hash);
    println!("===========================================\n");

    println!("Usage:");
    println!("1. Copy the hash above");
    println!("2. Store it in the 'password_hash' column of the 'users' table");
    println!("\nExample SQL:");
    println!(
        "UPDATE users SET password_hash = '{}', role = 'admin' WHERE email = 'admin@example.com';",
        password_hash
    );

    Ok(())
}
