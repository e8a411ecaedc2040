pub mod decode;

use crate::delivery::OverlaySink;
use crate::skyline::{extract, extract_pair, extract_raw, Orientation, Segment};

pub use decode::{decode_json, DecodedValue, JsonValueDecoder, ValueDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `vsky`: a skyline or skyline pair in its native frame.
    VerticalSkyline,
    /// `hsky`: a skyline or skyline pair reflected across y = x.
    HorizontalSkyline,
    /// `plines`: a list of endpoint pairs.
    Lines,
}

impl Command {
    pub const ALL: [Command; 3] = [Self::VerticalSkyline, Self::HorizontalSkyline, Self::Lines];

    pub fn name(self) -> &'static str {
        match self {
            Self::VerticalSkyline => "vsky",
            Self::HorizontalSkyline => "hsky",
            Self::Lines => "plines",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn usage(self) -> String {
        format!("Usage: {} <expression>", self.name())
    }
}

/// What the operator sees after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReport {
    /// Overlays were handed to the delivery channel.
    Shown { overlays: usize },
    /// Printed instead of rendering anything.
    Message(String),
}

/// Overlays for `value` under `command`, or the message explaining a shape
/// mismatch. Nothing is produced on mismatch.
pub fn overlays_for(command: Command, value: &DecodedValue) -> Result<Vec<Vec<Segment>>, String> {
    let orientation = match command {
        Command::VerticalSkyline => Orientation::Vertical,
        Command::HorizontalSkyline => Orientation::Horizontal,
        Command::Lines => {
            return match value {
                DecodedValue::OffsetPairs(pairs) => Ok(vec![extract_raw(pairs)]),
                other => Err(format!("Got {}, expected segment list", other.type_name())),
            };
        }
    };
    match value {
        DecodedValue::Skyline(sky) => Ok(vec![extract(sky, orientation)]),
        DecodedValue::SkylinePair(pair) => Ok(extract_pair(pair, orientation).into()),
        other => Err(format!(
            "Got {}, expected skyline or skyline pair",
            other.type_name()
        )),
    }
}

/// Resolves operator commands and feeds the results to a sink.
pub struct CommandHandler<D, S> {
    decoder: D,
    sink: S,
}

impl<D: ValueDecoder, S: OverlaySink> CommandHandler<D, S> {
    pub fn new(decoder: D, sink: S) -> Self {
        Self { decoder, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn invoke(&mut self, command: Command, argument: &str) -> CommandReport {
        let argument = argument.trim();
        if argument.is_empty() {
            return CommandReport::Message(command.usage());
        }
        let value = match self.decoder.decode(argument) {
            Ok(value) => value,
            Err(err) => return CommandReport::Message(format!("{argument}: {err:#}")),
        };
        let overlays = match overlays_for(command, &value) {
            Ok(overlays) => overlays,
            Err(message) => return CommandReport::Message(message),
        };
        for overlay in &overlays {
            let outcome = self.sink.deliver(overlay);
            tracing::debug!(
                command = command.name(),
                segments = overlay.len(),
                ?outcome,
                "overlay delivered"
            );
        }
        CommandReport::Shown {
            overlays: overlays.len(),
        }
    }

    /// Parses `<command> <expression>` and runs it.
    pub fn invoke_line(&mut self, line: &str) -> CommandReport {
        let line = line.trim();
        let (name, argument) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match Command::parse(name) {
            Some(command) => self.invoke(command, argument),
            None => {
                let known: Vec<&str> = Command::ALL.iter().map(|c| c.name()).collect();
                CommandReport::Message(format!(
                    "Unknown command {name:?}; expected one of {}",
                    known.join(", ")
                ))
            }
        }
    }
}
