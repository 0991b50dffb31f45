use std::path::PathBuf;

use clap::Parser;
use rudis::{server, Error};

const PORT: u16 = 8081;

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    #[arg(short, long, default_value_t = PORT)]
    port: u16,
    /// Where the snapshot database is written
    #[arg(long, default_value = "save.db")]
    save_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(args.port, args.save_path).await
}
