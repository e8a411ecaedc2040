use anyhow::{Context, Result};
use skyline_viewer::commands::{CommandHandler, CommandReport, JsonValueDecoder};
use skyline_viewer::delivery::{DeliveryChannel, InProcessFactory, OverlaySink, SubprocessFactory};
use skyline_viewer::logging;
use skyline_viewer::settings::{self, settings_arg};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands (the expression is a path to a JSON value file):
  vsky <expression>    show a skyline or skyline pair
  hsky <expression>    show a horizontal skyline or skyline pair
  plines <expression>  show a list of segments
  quit";

/// Operator console: reads commands from stdin and shows the results.
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = settings::load(settings_arg(&args)?.as_deref())?;
    logging::init(settings.debug_logging, settings.log_file.as_deref());

    if args.iter().any(|a| a == "--in-process") {
        tracing::info!("delivering overlays to an in-process window");
        let channel = DeliveryChannel::new(InProcessFactory::new(settings));
        run_console(CommandHandler::new(JsonValueDecoder, channel))
    } else {
        let factory = SubprocessFactory::from_settings(&settings);
        tracing::info!(
            viewer = factory.program(),
            "delivering overlays to a viewer process"
        );
        let channel = DeliveryChannel::new(factory);
        run_console(CommandHandler::new(JsonValueDecoder, channel))
    }
}

fn run_console<S: OverlaySink>(mut handler: CommandHandler<JsonValueDecoder, S>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{HELP}")?;
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("read command")?;
        let line = line.trim();
        match line {
            "" => {}
            "quit" | "exit" => break,
            "help" => writeln!(stdout, "{HELP}")?,
            _ => {
                if let CommandReport::Message(message) = handler.invoke_line(line) {
                    writeln!(stdout, "{message}")?;
                }
            }
        }
        prompt(&mut stdout)?;
    }
    Ok(())
}

fn prompt(stdout: &mut io::Stdout) -> Result<()> {
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}
