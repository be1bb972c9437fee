use std::{
    env,
    io::{self, BufRead},
    process,
};

use env_logger::Env;
use getopts::Options;
use log::error;
use nix::unistd::{getuid, User};
use rpassword::prompt_password_stderr;

use lockauth::{AuthConfig, Error, PromptStyle, CONFIG_FILE};

fn prompt_stderr(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut stdin_iter = stdin.lock().lines();
    eprint!("{}", prompt);
    Ok(stdin_iter.next().ok_or("end of input")??)
}

fn answer(style: PromptStyle, prompt: &str) -> Option<String> {
    let res: Result<String, Box<dyn std::error::Error>> = match style {
        PromptStyle::Visible => prompt_stderr(prompt),
        PromptStyle::Secret => prompt_password_stderr(prompt).map_err(|e| e.into()),
        PromptStyle::Info => {
            eprintln!("info: {}", prompt);
            return None;
        }
        PromptStyle::Error => {
            eprintln!("error: {}", prompt);
            return None;
        }
    };
    match res {
        Ok(answer) => Some(answer),
        Err(e) => {
            error!("unable to read answer: {}", e);
            None
        }
    }
}

fn load_config(path: Option<String>) -> Result<AuthConfig, Error> {
    match path {
        Some(path) => AuthConfig::load(path),
        None => match AuthConfig::load(CONFIG_FILE) {
            Ok(config) => Ok(config),
            Err(_) if std::fs::metadata(CONFIG_FILE).is_err() => Ok(Default::default()),
            Err(e) => Err(e),
        },
    }
}

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("v", "verbose", "log the progress of each attempt");
    opts.optopt("u", "user", "user to authenticate", "USER");
    opts.optopt("c", "config", "config file to use", "CONFIG_FILE");
    opts.optopt(
        "f",
        "max-failures",
        "maximum number of accepted failures",
        "FAILURES",
    );
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            println!("{}", f);
            print_usage(&program, opts);
            process::exit(1);
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, opts);
        process::exit(0);
    }

    let verbose = matches.opt_present("v");
    env_logger::Builder::from_env(Env::default().default_filter_or(if verbose {
        "debug"
    } else {
        "warn"
    }))
    .init();

    let max_failures: usize = match matches.opt_get("max-failures") {
        Ok(v) => v.unwrap_or(3),
        Err(e) => {
            eprintln!("unable to parse max failures: {}", e);
            process::exit(1)
        }
    };

    let mut config = match load_config(matches.opt_str("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1)
        }
    };
    config.verbose |= verbose;

    let user = match matches.opt_str("user") {
        Some(user) => user,
        None => match User::from_uid(getuid()) {
            Ok(Some(user)) => user.name,
            _ => {
                eprintln!("unable to determine the current user");
                process::exit(1)
            }
        },
    };

    if let Err(e) = lockauth::check_helper(&config) {
        eprintln!("{}", e);
        process::exit(1);
    }

    for _ in 0..max_failures {
        match lockauth::verify_user(&config, &user, answer) {
            Ok(()) => {
                eprintln!("Authentication successful");
                process::exit(0);
            }
            Err(Error::Denied(_)) => eprintln!("Authentication failure\n"),
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        }
    }
    process::exit(1);
}
