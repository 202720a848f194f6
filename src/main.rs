#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "structbuf", about = "Declarative binary struct reader and writer")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a binary file against a schema and print the value.
	Read {
		schema: PathBuf,
		data: PathBuf,
		#[arg(long, default_value_t = 0)]
		offset: usize,
		#[arg(long)]
		json: bool,
	},
	/// Encode a JSON value against a schema into a binary file.
	Write {
		schema: PathBuf,
		value: PathBuf,
		out: PathBuf,
		#[arg(long, default_value_t = 0)]
		offset: usize,
		#[arg(long, default_value_t = 65536)]
		capacity: usize,
	},
	/// Print the byte size a schema occupies.
	Size {
		schema: PathBuf,
		#[arg(long, default_value_t = 65536)]
		scratch: usize,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> structbuf::codec::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Read { schema, data, offset, json } => cmd::read::run(schema, data, offset, json),
		Commands::Write {
			schema,
			value,
			out,
			offset,
			capacity,
		} => cmd::write::run(schema, value, out, offset, capacity),
		Commands::Size { schema, scratch } => cmd::size::run(schema, scratch),
	}
}
