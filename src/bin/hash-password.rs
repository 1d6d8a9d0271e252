use bcrypt::{hash, DEFAULT_COST};
use std::env;

fn main() {
    let password = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --bin hash-password <PASSWORD>");
        std::process::exit(1);
    });

    let cost = env::var("BCRYPT_COST")
        .ok()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|c| (4..=31).contains(c))
        .unwrap_or(DEFAULT_COST);

    match hash(&password, cost) {
        Ok(hashed) => {
            println!("\nCost : {}", cost);
            println!("Hash : {}\n", hashed);
            println!("# Paste this into your .env next to ADMIN_EMAIL:");
            println!("ADMIN_PASSWORD_HASH={}", hashed);
        }
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    }
}
