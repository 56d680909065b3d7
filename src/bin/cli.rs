//! ClientKeeper CLI Client
//!
//! Command-line interface for a running ClientKeeper server.

use clap::{Parser, Subcommand};
use clientkeeper::network::Client;
use clientkeeper::record::{fields_to_json, ClientForm};
use clientkeeper::{PageRequest, Result, SortDirection, SortKey};
use serde_json::{json, Value as JsonValue};

/// ClientKeeper CLI
#[derive(Parser, Debug)]
#[command(name = "clientkeeper-cli")]
#[command(about = "CLI for the ClientKeeper contact service")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List one page of clients
    List {
        /// Case-insensitive regex matched against every field
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Field to sort by
        #[arg(long, default_value = "first_name")]
        sort_field: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Zero-based page number
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Records per page
        #[arg(long, default_value = "10")]
        page_size: usize,
    },

    /// Count clients matching a filter
    Count {
        #[arg(short, long, default_value = "")]
        filter: String,
    },

    /// Add a client
    Add {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    },

    /// Update a client's name or email
    Update {
        /// The client id
        id: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a client
    Delete {
        /// The client id
        id: String,
    },
}

fn main() {
    let args = Args::parse();
    match Client::new(args.server).and_then(|client| run(&client, args.command)) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(client: &Client, command: Commands) -> Result<String> {
    let output = match command {
        Commands::List {
            filter,
            sort_field,
            asc,
            page,
            page_size,
        } => {
            let direction = if asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let request = PageRequest::new(page_size)
                .with_filter(filter)
                .with_sort(SortKey::new(sort_field, direction))
                .with_page(page);
            JsonValue::Array(client.list(&request)?)
        }

        Commands::Count { filter } => json!({ "length": client.count(&filter)? }),

        Commands::Add {
            first_name,
            last_name,
            email,
            phone,
        } => {
            let form = ClientForm::new(first_name, last_name, email, phone);
            form.validate()?;
            client.create(&fields_to_json(&form.into_fields()))?
        }

        Commands::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            let mut fields = serde_json::Map::new();
            for (name, value) in [
                ("first_name", first_name),
                ("last_name", last_name),
                ("email", email),
            ] {
                if let Some(value) = value {
                    fields.insert(name.to_string(), JsonValue::String(value));
                }
            }
            client
                .update(&id, &JsonValue::Object(fields))?
                .unwrap_or(JsonValue::Null)
        }

        Commands::Delete { id } => json!({ "deleted": client.delete(&id)? }),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
