//! Export the `OpenAPI` document as JSON for client codegen.
//!
//! Usage: `cargo run --bin export_openapi -- --pretty > ../web/openapi.json`

#![allow(clippy::print_stdout)]

use civic_roster_api::rest::ApiDoc;
use clap::Parser;
use utoipa::OpenApi;

#[derive(Parser)]
#[command(name = "export_openapi", about = "Print the Civic Roster OpenAPI document", version)]
struct Cli {
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), serde_json::Error> {
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let json = if cli.pretty {
        doc.to_pretty_json()?
    } else {
        doc.to_json()?
    };
    println!("{json}");
    Ok(())
}
