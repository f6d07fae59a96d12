use std::{
    error::Error,
    io::{self},
    process::exit,
};

use clap::Parser;
use rusqlite::Connection;

use wagekeeper::{
    PasswordHash, ValidatedPassword, initialize_db,
    user::{create_user, get_user_by_username, update_password},
};

/// A utility for creating the admin user, or resetting their password.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    ///
    /// The database is created and initialized if it does not exist yet.
    #[arg(long)]
    db_path: String,

    /// The username for the admin account.
    #[arg(long, default_value = "admin")]
    username: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let existing_user = get_user_by_username(&args.username, &connection).ok();

    match &existing_user {
        Some(user) => println!("Resetting password for '{}'", user.username),
        None => println!("Creating admin user '{}'", args.username),
    }

    let password_hash = match prompt_for_password_hash() {
        Some(password_hash) => password_hash,
        None => return Ok(()),
    };

    match existing_user {
        Some(user) => {
            update_password(user.id, &password_hash, &connection)?;
            println!("Password updated successfully!");
        }
        None => {
            create_user(&args.username, password_hash, &connection)?;
            println!("Admin user created successfully!");
        }
    }

    Ok(())
}

fn prompt_for_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                exit(1);
            }
        };

        if let Err(error) = ValidatedPassword::new(&first_password) {
            print_error(error);
            continue;
        }

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                exit(1);
            }
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::from_raw_password(&first_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
                continue;
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
