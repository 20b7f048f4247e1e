use {
    spl_token_walkthrough_cli::{
        clap_app::app,
        command::process_walkthrough,
        config::{storage_from_matches, Config, WalkthroughParams},
        Error,
    },
    spl_token_walkthrough_metadata::storage::StorageDriver,
    std::process::exit,
};

#[tokio::main]
async fn main() {
    let matches = app().get_matches();

    let log_level = matches.value_of("log_level").unwrap_or("info");
    solana_logger::setup_with_default(&format!(
        "solana={level},spl_token_walkthrough={level}",
        level = log_level
    ));

    match run(&matches).await {
        Ok(()) => {
            println!("Finished successfully");
        }
        Err(err) => {
            eprintln!("error: {}", err);
            exit(1);
        }
    }
}

async fn run(matches: &clap::ArgMatches<'_>) -> Result<(), Error> {
    let params = WalkthroughParams::new(matches)?;
    let storage = storage_from_matches(matches)?;
    let config = Config::new(matches).await?;

    let output = process_walkthrough(
        &config,
        &params,
        storage.as_ref().map(|storage| storage as &dyn StorageDriver),
    )
    .await?;
    println!("{}", output);
    Ok(())
}
