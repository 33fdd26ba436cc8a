use std::io::{self, Write};

use crate::error::ShellError;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: Vec<Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub name: &'static str,
    pub short: &'static str,
    pub long: &'static str,
    pub description: &'static str,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Flag {
    const fn new(
        name: &'static str,
        short: &'static str,
        long: &'static str,
        description: &'static str,
    ) -> Self {
        Flag {
            name,
            short,
            long,
            description,
            takes_value: false,
            value: None,
        }
    }

    const fn with_value(mut self) -> Self {
        self.takes_value = true;
        self
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        Flags {
            flags: vec![
                Flag::new("help", "-h", "--help", "Print this help message"),
                Flag::new("version", "-v", "--version", "Show version information"),
                Flag::new(
                    "config",
                    "-c",
                    "--config",
                    "Read startup settings from <path>",
                )
                .with_value(),
                Flag::new(
                    "quiet",
                    "-q",
                    "--quiet",
                    "Only log errors, hide job notices",
                ),
                Flag::new("debug", "-d", "--debug", "Enable debug logging"),
            ],
        }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let flag = self
                .flags
                .iter_mut()
                .find(|flag| arg == flag.short || arg == flag.long)
                .ok_or_else(|| ShellError::FlagError(format!("Unknown flag {}", arg)))?;

            if flag.takes_value {
                let value = args
                    .next()
                    .ok_or_else(|| {
                        ShellError::FlagError(format!("Flag {} requires a value", arg))
                    })?;
                flag.value = Some(value.clone());
            } else {
                flag.value = Some("true".to_string());
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get_value(name).is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags
            .iter()
            .find(|flag| flag.name == name)
            .and_then(|flag| flag.value.as_ref())
    }

    pub fn write_help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Usage: shelly [OPTIONS]")?;
        writeln!(out, "\nOptions:")?;
        for flag in &self.flags {
            let long = if flag.takes_value {
                format!("{} <path>", flag.long)
            } else {
                flag.long.to_string()
            };
            writeln!(out, "  {}, {:<17} {}", flag.short, long, flag.description)?;
        }
        Ok(())
    }

    pub fn print_help(&self) -> io::Result<()> {
        self.write_help(&mut io::stdout().lock())
    }
}
