use anyhow::Result;
use clap::Parser;
use texreport::cli;
use texreport::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    cli.init_logging();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
