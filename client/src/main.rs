use std::process::ExitCode;

use clap::{Parser, Subcommand, Args};
use url::Url;

mod api;
mod form;

use api::RegistrationApi;
use form::SignUpForm;

#[derive(Parser)]
struct AppArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(short = 'p', long)]
    port: Option<u16>,
    #[arg(short = 's', long)]
    secure: bool,

    #[command(subcommand)]
    action: Action
}

#[derive(Args)]
struct RegisterAction {
    #[arg(short = 'u', long)]
    username: String,
    #[arg(short = 'e', long)]
    email: String,
    /// prompted for when not given
    #[arg(long)]
    password: Option<String>,
    /// prompted for when not given
    #[arg(long)]
    confirm_password: Option<String>,
}

#[derive(Subcommand)]
enum Action {
    #[command()]
    Ping,
    Register(RegisterAction),
}

fn ping_action(api: &RegistrationApi) -> ExitCode {
    match api.health() {
        Ok(body) => {
            match serde_json::to_string_pretty(&body) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{}", body),
            }

            ExitCode::SUCCESS
        },
        Err(err) => {
            println!("{}", err);

            ExitCode::FAILURE
        }
    }
}

fn prompt_if_missing(given: Option<String>, prompt: &str) -> std::io::Result<String> {
    match given {
        Some(value) => Ok(value),
        None => rpassword::prompt_password(prompt),
    }
}

fn register_action(api: &RegistrationApi, reg: RegisterAction) -> ExitCode {
    let password = match prompt_if_missing(reg.password, "Password: ") {
        Ok(value) => value,
        Err(err) => {
            log::error!("failed to read password {:?}", err);

            return ExitCode::FAILURE;
        }
    };
    let confirm_password = match prompt_if_missing(reg.confirm_password, "Confirm password: ") {
        Ok(value) => value,
        Err(err) => {
            log::error!("failed to read password confirmation {:?}", err);

            return ExitCode::FAILURE;
        }
    };

    let mut form = SignUpForm {
        username: reg.username,
        email: reg.email,
        password,
        confirm_password,
    };

    if form.show_password_error() {
        println!("Passwords do not match");
    }

    if !form.is_form_valid() {
        println!("not submitted: username, email, password and confirmation are all required and the passwords must match");

        return ExitCode::FAILURE;
    }

    let notification = form.submit(api);

    println!("{}", notification);

    if notification.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = AppArgs::parse();
    let mut server_url = Url::parse("http://localhost:3000/")
        .expect("default server url is valid");

    if args.secure && server_url.set_scheme("https").is_err() {
        println!("failed to switch to https");

        return ExitCode::FAILURE;
    }

    if let Some(host) = args.host {
        if let Err(err) = server_url.set_host(Some(&host)) {
            println!("invalid host value provided {}", err);

            return ExitCode::FAILURE;
        }
    }

    if let Some(port) = args.port {
        if server_url.set_port(Some(port)).is_err() {
            println!("invalid port value provided");

            return ExitCode::FAILURE;
        }
    }

    let api = match RegistrationApi::new(server_url) {
        Ok(api) => api,
        Err(err) => {
            log::error!("failed to build http client {}", err);

            return ExitCode::FAILURE;
        }
    };

    match args.action {
        Action::Ping => ping_action(&api),
        Action::Register(reg) => register_action(&api, reg),
    }
}
