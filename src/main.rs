use battlesnake_fuzzer::config::Config;
use battlesnake_fuzzer::server;
use log::info;

#[rocket::launch]
fn rocket() -> _ {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Battlesnake fuzzer...");

    // Load configuration once at startup; the listening port comes only from here
    let config = Config::load_or_default();
    info!(
        "Listening on {}:{}",
        config.server.address, config.server.port
    );

    server::build(config)
}
