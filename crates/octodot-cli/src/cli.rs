#![forbid(unsafe_code)]

//! Command-line argument parsing for the `octodot` binary.
//!
//! Parses args by hand. Every option also has an `OCTODOT_*` environment
//! variable; flags on the command line win over the environment.

use std::env;
use std::path::PathBuf;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
OctoDot: 8-dot cell codecs, sub-cell renderers and temporal dot-flow

USAGE:
    octodot <COMMAND> [OPTIONS] [ARGS...]

Inputs come from ARGS when given, otherwise from stdin. Samples are
numbers separated by whitespace or commas.

COMMANDS:
    encode       Text to cell glyphs
    decode       Cell glyphs back to text
    wave         One-line waveform of samples
    graph        Multi-row waveform of samples
    spark        Sparkline of samples
    heatmap      Heatmap, one grid row per input line
    gradient     Intensity gradient strip
    flow         Flow signature report for glyphs
    compare      Flow and pattern similarity of two glyph strings
    fingerprint  Waveform, envelope, spectrum and spectrogram of samples
    index        Chunk samples into a flow index file
    search       Rank index chunks against query samples

OPTIONS:
    --no-connect         wave/graph: plot points without joining them
    --height=N           graph: rows (default: 4)
    --width=N            spark: cells (default: one per two samples)
                         gradient: cells (default: 20)
    --no-normalize       heatmap: values are already in [0, 1]
    --json               flow/compare/search: JSON output
    --rate=HZ            Sample rate (default: 44100)
    --pcm=BYTES          Read stdin as little-endian PCM, 1, 2 or 4 bytes/sample
    --channels=N         PCM channels, averaged per frame (default: 1)
    --index=FILE         index/search: JSON index file
    --source=NAME        index: recording name (default: stdin)
    --chunk-secs=S       index: chunk length in seconds (default: 3)
    --top=K              search: hits shown at most (default: 5)
    --min-score=X        search: lowest score shown (default: 0.4)
    --log=FILTER         Log filter directives (default: warn)
    --log-format=FMT     Log format: 'pretty' (default) or 'json'
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    OCTODOT_RATE          Override --rate
    OCTODOT_INDEX         Override --index
    OCTODOT_TOP_K         Override --top
    OCTODOT_LOG           Override --log
    OCTODOT_LOG_FORMAT    Override --log-format";

/// Subcommand to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Encode,
    Decode,
    Wave,
    Graph,
    Spark,
    Heatmap,
    Gradient,
    Flow,
    Compare,
    Fingerprint,
    Index,
    Search,
}

impl Command {
    pub const ALL: [Self; 12] = [
        Self::Encode,
        Self::Decode,
        Self::Wave,
        Self::Graph,
        Self::Spark,
        Self::Heatmap,
        Self::Gradient,
        Self::Flow,
        Self::Compare,
        Self::Fingerprint,
        Self::Index,
        Self::Search,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
            Self::Wave => "wave",
            Self::Graph => "graph",
            Self::Spark => "spark",
            Self::Heatmap => "heatmap",
            Self::Gradient => "gradient",
            Self::Flow => "flow",
            Self::Compare => "compare",
            Self::Fingerprint => "fingerprint",
            Self::Index => "index",
            Self::Search => "search",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub command: Command,
    /// Positional arguments after the command.
    pub args: Vec<String>,
    pub connect: bool,
    pub height: usize,
    pub width: Option<usize>,
    pub normalize: bool,
    pub json: bool,
    pub rate: u32,
    /// PCM bytes per sample; `None` reads numbers as text.
    pub pcm_width: Option<u16>,
    pub channels: u16,
    pub index_path: Option<PathBuf>,
    pub source: String,
    pub chunk_secs: f64,
    pub top_k: usize,
    pub min_score: f64,
    pub log_filter: String,
    pub log_format: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            command: Command::Encode,
            args: Vec::new(),
            connect: true,
            height: 4,
            width: None,
            normalize: true,
            json: false,
            rate: 44_100,
            pcm_width: None,
            channels: 1,
            index_path: None,
            source: "stdin".into(),
            chunk_secs: 3.0,
            top_k: 5,
            min_score: 0.4,
            log_filter: "warn".into(),
            log_format: "pretty".into(),
        }
    }
}

/// Outcome of parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

fn number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}

impl Opts {
    /// Parse the process arguments and environment, exiting on help,
    /// version or a usage error.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("octodot {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(2);
            }
        }
    }

    /// Parse `args` (without the program name), reading overrides through
    /// `var`.
    pub fn parse_from<I, F>(args: I, var: F) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first
        if let Some(val) = var("OCTODOT_RATE")
            && let Ok(n) = val.parse()
        {
            opts.rate = n;
        }
        if let Some(val) = var("OCTODOT_INDEX") {
            opts.index_path = Some(PathBuf::from(val));
        }
        if let Some(val) = var("OCTODOT_TOP_K")
            && let Ok(n) = val.parse()
        {
            opts.top_k = n;
        }
        if let Some(val) = var("OCTODOT_LOG") {
            opts.log_filter = val;
        }
        if let Some(val) = var("OCTODOT_LOG_FORMAT") {
            opts.log_format = val;
        }

        let mut command = None;
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--no-connect" => opts.connect = false,
                "--no-normalize" => opts.normalize = false,
                "--json" => opts.json = true,
                other if other.starts_with("--") => opts.apply_flag(other)?,
                other => {
                    if command.is_none() {
                        command = Some(
                            Command::from_name(other)
                                .ok_or_else(|| format!("Unknown command: {other}"))?,
                        );
                    } else {
                        opts.args.push(other.to_string());
                    }
                }
            }
        }

        opts.command = command.ok_or_else(|| "Missing command".to_string())?;
        opts.validate()?;
        Ok(Parsed::Run(opts))
    }

    fn apply_flag(&mut self, flag: &str) -> Result<(), String> {
        let (name, val) = flag
            .split_once('=')
            .ok_or_else(|| format!("Unknown argument: {flag}"))?;
        match name {
            "--height" => self.height = number(name, val)?,
            "--width" => self.width = Some(number(name, val)?),
            "--rate" => self.rate = number(name, val)?,
            "--pcm" => self.pcm_width = Some(number(name, val)?),
            "--channels" => self.channels = number(name, val)?,
            "--index" => self.index_path = Some(PathBuf::from(val)),
            "--source" => self.source = val.to_string(),
            "--chunk-secs" => self.chunk_secs = number(name, val)?,
            "--top" => self.top_k = number(name, val)?,
            "--min-score" => self.min_score = number(name, val)?,
            "--log" => self.log_filter = val.to_string(),
            "--log-format" => self.log_format = val.to_string(),
            _ => return Err(format!("Unknown argument: {flag}")),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), String> {
        if self.rate == 0 {
            return Err("--rate must be positive".into());
        }
        if self.channels == 0 {
            return Err("--channels must be positive".into());
        }
        if !(self.chunk_secs.is_finite() && self.chunk_secs > 0.0) {
            return Err("--chunk-secs must be positive".into());
        }
        if self.command == Command::Compare && self.args.len() != 2 {
            return Err("compare takes exactly two glyph strings".into());
        }
        if matches!(self.command, Command::Index | Command::Search) && self.index_path.is_none() {
            return Err(format!("{} needs --index=FILE", self.command.name()));
        }
        Ok(())
    }
}
