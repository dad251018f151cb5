// Rocket assembly shared by the binary and the HTTP tests

use rocket::fairing::AdHoc;
use rocket::{routes, Build, Rocket};

use crate::config::Config;
use crate::handler;
use crate::journal::Journal;
use crate::simulator::Simulator;

/// Builds the server for a configuration without launching it
pub fn build(config: Config) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    let journal = Journal::new(config.debug.enabled, &config.debug.log_file_path);
    let simulator = Simulator::new(&config).with_journal(journal);

    rocket::custom(figment)
        .manage(simulator)
        .manage(config.server)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/github/battlesnake-fuzzer");
            })
        }))
        .mount("/", routes![handler::simulate])
}
