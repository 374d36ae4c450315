mod cli;
mod logs;

use clap::{CommandFactory, Parser};
use cli::Cli;
use httpclient::HttpClient;
use log::debug;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logs::init(cli.log_level()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("failed to initialise logging: {}", e);
            None
        }
    };

    let (method, url) = match cli.method_and_url() {
        Ok(Some(request)) => request,
        Ok(None) => {
            println!("{}", Cli::command().render_help());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::FAILURE;
        }
    };

    let client = HttpClient::with_config(cli.client_config());
    let params = cli.params();

    match client.command(url, method, params.as_ref()) {
        Ok(response) => {
            println!("{}", response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("{} {} failed: {:?}", method, url, e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
