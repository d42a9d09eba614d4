use clap::Parser;
use modelkit::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Resolve(args) => cli::overrides::resolve(args).await,
        Command::List => cli::overrides::list().await,
        Command::Show(args) => cli::overrides::show(args).await,
        Command::Set(args) => cli::overrides::set(args).await,
        Command::Clear(args) => cli::overrides::clear(args).await,
    }
}
