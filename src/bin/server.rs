use clap::Parser;
use memds::{server, Error};

const HOST: &str = "127.0.0.1";
const PORT: u16 = 6379;
const MAX_CONNECTIONS: usize = 64;

#[derive(Parser, Debug)]
struct Args {
    /// The address to bind to
    #[arg(long, env = "MEMDS_HOST", default_value = HOST)]
    host: String,

    /// The port to listen on
    #[arg(short, long, env = "MEMDS_PORT", default_value_t = PORT)]
    port: u16,

    /// Maximum number of simultaneously served connections
    #[arg(long, env = "MEMDS_MAX_CONNECTIONS", default_value_t = MAX_CONNECTIONS)]
    max_connections: usize,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(&args.host, args.port, args.max_connections).await
}
