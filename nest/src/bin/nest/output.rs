use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table, presets};
use serde::Serialize;

#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Bordered table (default)
    #[default]
    Table,
    /// Pretty JSON, for scripts
    Json,
    /// One line per listing
    Compact,
}

#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Something a command can print as a table or a compact line.
pub trait TableDisplay {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

/// Kind of status line. Each tone has its own icon and color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Muted,
    Heading,
    Accent,
}

impl Tone {
    pub const fn icon(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Error => "✗",
            Tone::Warning => "!",
            Tone::Info => "•",
            Tone::Muted | Tone::Heading | Tone::Accent => "›",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Tone::Success => Color::Green,
            Tone::Error => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Info => Color::Blue,
            Tone::Muted => Color::BrightBlack,
            Tone::Heading => Color::Cyan,
            Tone::Accent => Color::Magenta,
        }
    }

    /// Color `text` in this tone unless colors are off.
    pub fn paint(self, text: &str, bold: bool, use_color: bool) -> String {
        if !use_color {
            return text.to_string();
        }
        let painted = text.color(self.color());
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }
}

pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Print `data` in the selected format. Quiet mode prints nothing.
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Table => println!("{}", data.to_table(self)),
            OutputFormat::Compact => println!("{}", data.to_compact()),
        }
        Ok(())
    }

    /// Status lines would corrupt JSON on stdout.
    fn suppress_status(&self) -> bool {
        self.options.quiet || self.options.output_format == OutputFormat::Json
    }

    fn status_line(&self, tone: Tone, message: &str) -> String {
        let use_color = !self.options.no_color;
        format!("{} {}", tone.paint(tone.icon(), false, use_color), tone.paint(message, false, use_color))
    }

    pub fn success(&self, message: &str) {
        if !self.suppress_status() {
            println!("{}", self.status_line(Tone::Success, message));
        }
    }

    /// Errors are always shown, on stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Tone::Error, message));
    }

    pub fn warning(&self, message: &str) {
        if !self.suppress_status() {
            println!("{}", self.status_line(Tone::Warning, message));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.suppress_status() {
            println!("{}", self.status_line(Tone::Info, message));
        }
    }

    /// Only with `--verbose`; goes to stderr so it never mixes with results.
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.status_line(Tone::Muted, message));
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if !self.suppress_status() {
            let use_color = !self.options.no_color;
            println!("{}: {value}", Tone::Heading.paint(key, true, use_color));
        }
    }

    pub fn create_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        });
        table
    }

    pub fn add_table_header(&self, table: &mut Table, headers: &[&str]) {
        let no_color = self.options.no_color;
        table.set_header(headers.iter().map(|title| {
            let cell = Cell::new(title).add_attribute(Attribute::Bold);
            if no_color { cell } else { cell.fg(TableColor::Cyan) }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Tally {
        location: String,
        listings: u32,
    }

    impl TableDisplay for Tally {
        fn to_table(&self, output: &OutputManager) -> Table {
            let mut table = output.create_table();
            output.add_table_header(&mut table, &["Location", "Listings"]);
            table.add_row(vec![Cell::new(&self.location), Cell::new(self.listings)]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{} {}", self.location, self.listings)
        }
    }

    fn tally() -> Tally {
        Tally {
            location: "Roorkee".to_string(),
            listings: 3,
        }
    }

    #[test]
    fn displays_in_every_format() {
        for output_format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Compact] {
            let manager = OutputManager::new(GlobalOptions {
                output_format,
                no_color: true,
                ..Default::default()
            });
            assert!(manager.display(&tally()).is_ok());
        }
    }

    #[test]
    fn table_contains_headers_and_row() {
        let manager = OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        });
        let rendered = tally().to_table(&manager).to_string();
        assert!(rendered.contains("Location"));
        assert!(rendered.contains("Roorkee"));
    }

    #[test]
    fn json_output_suppresses_status_lines() {
        let manager = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        assert!(manager.suppress_status());
        assert!(!OutputManager::new(GlobalOptions::default()).suppress_status());
    }

    #[test]
    fn plain_status_line_has_icon_and_message() {
        let manager = OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        });
        assert_eq!(manager.status_line(Tone::Success, "Seeded 6 listings"), "✓ Seeded 6 listings");
        assert_eq!(Tone::Warning.paint("careful", true, false), "careful");
    }
}
