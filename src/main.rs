use shelly::flags::Flags;
use shelly::shell::Shell;
use std::env;
use tracing::Level;

fn main() -> Result<(), shelly::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help()?;
        return Ok(());
    }

    if flags.is_set("version") {
        println!("Shelly {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let level = if flags.is_set("debug") {
        Level::DEBUG
    } else if flags.is_set("quiet") {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut shell = Shell::new(flags)?;
    shell.run()
}
