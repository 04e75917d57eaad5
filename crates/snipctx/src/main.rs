use clap::Parser;

fn main() -> anyhow::Result<()> {
    snipctx::init();

    let cli = snipctx::cli::Cli::parse();
    snipctx::cli::run(cli)
}
