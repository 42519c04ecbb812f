// src/main.rs

use monorun::config::EnvSnapshot;
use monorun::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("monorun error: {err:?}");
            std::process::exit(2);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    let env = EnvSnapshot::capture();
    logging::init_logging(args.log_level, &env)?;
    let status = run(args, &env).await?;
    Ok(status.exit_code())
}
