use dotenvy::dotenv;
use log::{error, info};
use voucher_relay_server::{
    cli::handle_command_line_args,
    config::ServerConfig,
    server::{preflight_check, run_server},
};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = ServerConfig::from_env_or_default();
    let api = match preflight_check(&config) {
        Ok(api) => api,
        Err(e) => {
            error!("🚀️ Cannot start the voucher relay. {e}");
            eprintln!("{e}");
            std::process::exit(1);
        },
    };

    info!("🚀️ Starting server on {}:{}{}", config.host, config.port, config.route_prefix);
    match run_server(config, api).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
