use clap::{ArgAction, Parser};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use consolefmt::{should_use_colors_for, ConsoleWriter, WriterConfig};

#[derive(Parser)]
#[command(name = "consolefmt")]
#[command(about = "Render newline-delimited JSON log records as colorized console lines")]
#[command(version)]
struct Args {
    /// Input file (default: stdin)
    #[arg(short = 'i', long = "input")]
    input_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,

    /// Time layout for the timestamp field (strftime syntax)
    #[arg(long, value_name = "LAYOUT")]
    time_format: Option<String>,

    /// Comma-separated known-field order (e.g. "time,level,message")
    #[arg(long, value_name = "FIELDS")]
    parts: Option<String>,

    /// Record key carrying the timestamp (default: "time")
    #[arg(long, value_name = "KEY")]
    timestamp_key: Option<String>,

    /// Suppress a field from output (repeatable)
    #[arg(long = "hide", value_name = "KEY", action = ArgAction::Append)]
    hidden: Vec<String>,

    /// Force colors on
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Force colors off
    #[arg(long, overrides_with = "color")]
    no_color: bool,

    /// Fail on the first undecodable line instead of passing it through
    #[arg(long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("consolefmt: error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = WriterConfig::default();

    if let Some(key) = &args.timestamp_key {
        config = config.with_timestamp_field(key.clone());
    }
    if let Some(layout) = args.time_format {
        config.time_format = layout;
    }
    if let Some(parts) = args.parts {
        config.parts_order = parts
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }
    config.hidden_fields = args.hidden;
    config.use_colors = Some(if args.color {
        true
    } else if args.no_color {
        false
    } else {
        args.output_file.is_none() && should_use_colors_for(&io::stdout())
    });

    let input: Box<dyn BufRead> = match &args.input_file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open '{}': {}", path.display(), e))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };
    let output: Box<dyn Write> = match &args.output_file {
        Some(path) => Box::new(
            File::create(path)
                .map_err(|e| format!("cannot create '{}': {}", path.display(), e))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = ConsoleWriter::with_config(output, config);
    let mut skipped = 0usize;

    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match writer.write(line.as_bytes()) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                if args.strict {
                    return Err(format!("line {}: {}", lineno + 1, e).into());
                }
                // Not a JSON record; pass the line through untouched
                skipped += 1;
                writeln!(writer.get_mut(), "{}", line)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    writer.flush()?;

    if skipped > 0 {
        eprintln!(
            "consolefmt: warning: {} line(s) were not valid JSON records and were passed through",
            skipped
        );
    }

    Ok(())
}
