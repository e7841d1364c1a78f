use std::path::PathBuf;

use clap::Parser;

use dipi::console;
use dipi::error::DipiError;
use dipi::script::ScriptContext;
use dipi::shell::ShellRunner;
use dipi::sshclient::SshProvider;

#[derive(clap::Parser, Debug)]
#[clap(version, about, long_about = None)]
struct App {
    #[clap(help = "The deployment instructions file")]
    file: PathBuf,

    #[clap(help = "The destination (local path or <user>@<host>:<path>[ -p <port>])")]
    destination: String,

    #[clap(long, short = 'd', help = "print the parsed instructions without executing them", default_value_t = false, action)]
    debug: bool,
}

fn main() {
    env_logger::init();

    // display a welcome message
    console::log(format!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")).as_str());

    // parse the command line arguments
    let app = App::parse();

    if let Err(err) = deploy(&app) {
        console::error(err.to_string().as_str());
        std::process::exit(1);
    }
}

fn deploy(app: &App) -> Result<(), DipiError> {
    if app.debug {
        for instruction in dipi::parser::load(&app.file)? {
            println!("> {} {}", instruction.word, instruction.args);
        }
        return Ok(());
    }

    let mut ctx = ScriptContext::new(
        app.destination.clone(),
        &app.file,
        Box::new(SshProvider),
        Box::new(ShellRunner),
    )?;

    // close every open session whether the run succeeded or not
    let result = ctx.run_file(&app.file);
    ctx.close_all();
    result
}
