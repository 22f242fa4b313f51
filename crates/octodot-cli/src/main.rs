#![forbid(unsafe_code)]

//! `octodot` command-line tool.

mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use octodot::core::logging::{LogFormat, init_subscriber};
use octodot::{
    BresenhamConfig, Error, FingerprintConfig, Fingerprinter, FlowIndex, FlowRecord, IndexConfig,
    IndexEntry, OctoBresenham, Result, check_finite, decode_text, encode_flow, encode_text,
    flow_report, flow_similarity, pattern_similarity, pcm_to_samples, render_gradient,
    render_heatmap, render_sparkline,
};

use cli::{Command, Opts};

const DEFAULT_GRADIENT_WIDTH: usize = 20;

fn main() {
    let opts = Opts::parse();
    init_subscriber(&opts.log_filter, LogFormat::from_name(&opts.log_format));

    if let Err(err) = run(&opts) {
        tracing::error!(command = opts.command.name(), %err, "command failed");
        eprintln!("octodot: {err}");
        process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<()> {
    let _span = tracing::info_span!("run", command = opts.command.name()).entered();

    let output = match opts.command {
        Command::Encode => encode_text(&text_input(opts)?),
        Command::Decode => decode_text(&text_input(opts)?),
        Command::Wave => renderer(opts).render(&read_samples(opts)?),
        Command::Graph => renderer(opts).render_multi_row(&read_samples(opts)?, opts.height),
        Command::Spark => render_sparkline(&read_samples(opts)?, opts.width),
        Command::Heatmap => render_heatmap(&read_grid(opts)?, opts.normalize),
        Command::Gradient => render_gradient(opts.width.unwrap_or(DEFAULT_GRADIENT_WIDTH)),
        Command::Flow => flow(opts)?,
        Command::Compare => compare(opts)?,
        Command::Fingerprint => {
            let samples = read_samples(opts)?;
            Fingerprinter::new(FingerprintConfig::default())
                .fingerprint(&samples, opts.rate)
                .to_string()
        }
        Command::Index => index(opts)?,
        Command::Search => search(opts)?,
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

fn renderer(opts: &Opts) -> OctoBresenham {
    OctoBresenham::new(BresenhamConfig::default().connect(opts.connect))
}

// --- Input ----------------------------------------------------------------

/// Positional args joined by spaces, or all of stdin without the final
/// newline.
fn text_input(opts: &Opts) -> Result<String> {
    if !opts.args.is_empty() {
        return Ok(opts.args.join(" "));
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let samples = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| Error::Usage(format!("not a number: {tok:?}")))
        })
        .collect::<Result<Vec<_>>>()?;
    check_finite(&samples)?;
    Ok(samples)
}

/// Samples from args or stdin, as text or as raw PCM with `--pcm`.
fn read_samples(opts: &Opts) -> Result<Vec<f64>> {
    match opts.pcm_width {
        Some(width) => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            let samples = pcm_to_samples(&bytes, width, opts.channels)?;
            tracing::debug!(bytes = bytes.len(), samples = samples.len(), "decoded pcm");
            Ok(samples)
        }
        None => parse_samples(&text_input(opts)?),
    }
}

fn read_grid(opts: &Opts) -> Result<Vec<Vec<f64>>> {
    let text = if opts.args.is_empty() {
        text_input(opts)?
    } else {
        opts.args.join("\n")
    };
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_samples)
        .collect()
}

// --- Flow -----------------------------------------------------------------

fn flow(opts: &Opts) -> Result<String> {
    let sig = encode_flow(&text_input(opts)?);
    if opts.json {
        let record = FlowRecord::from_signature(&sig);
        Ok(serde_json::to_string_pretty(&record).map_err(io::Error::from)?)
    } else {
        Ok(flow_report(&sig))
    }
}

fn compare(opts: &Opts) -> Result<String> {
    let [a, b] = opts.args.as_slice() else {
        return Err(Error::Usage("compare takes exactly two glyph strings".into()));
    };
    let flow = flow_similarity(&encode_flow(a), &encode_flow(b));
    let pattern = pattern_similarity(a, b);
    if opts.json {
        let value = serde_json::json!({ "flow_similarity": flow, "pattern_similarity": pattern });
        return Ok(value.to_string());
    }
    Ok(format!("Flow similarity:    {flow:.3}\nPattern similarity: {pattern:.3}"))
}

// --- Index ----------------------------------------------------------------

fn index_config(opts: &Opts) -> IndexConfig {
    IndexConfig::default()
        .chunk_secs(opts.chunk_secs)
        .top_k(opts.top_k)
        .min_similarity(opts.min_score)
}

fn index_path(opts: &Opts) -> Result<&Path> {
    opts.index_path
        .as_deref()
        .ok_or_else(|| Error::Usage(format!("{} needs --index=FILE", opts.command.name())))
}

/// Entries stored at `path`; a missing file is an empty index.
fn load_entries(path: &Path) -> Result<Vec<IndexEntry>> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(serde_json::from_str(&json).map_err(io::Error::from)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

fn index(opts: &Opts) -> Result<String> {
    let path = index_path(opts)?;
    let samples = read_samples(opts)?;
    let mut index = FlowIndex::with_entries(index_config(opts), load_entries(path)?);

    let stored = index.index_samples(&opts.source, &samples, opts.rate);
    let json = serde_json::to_string_pretty(index.entries()).map_err(io::Error::from)?;
    fs::write(path, json)?;
    tracing::info!(stored, total = index.len(), path = %path.display(), "index written");

    let mut summary = format!(
        "Indexed {stored} chunks from {} ({} total)",
        opts.source,
        index.len()
    );
    for (flow, count) in index.dominant_counts() {
        summary.push_str(&format!("\n  {} {:<8} {count}", flow.symbol(), flow.name()));
    }
    Ok(summary)
}

fn search(opts: &Opts) -> Result<String> {
    let path = index_path(opts)?;
    let samples = read_samples(opts)?;
    let index = FlowIndex::with_entries(index_config(opts), load_entries(path)?);
    let hits = index.search(&samples, opts.rate)?;
    tracing::debug!(hits = hits.len(), entries = index.len(), "search done");

    if opts.json {
        let rows: Vec<_> = hits
            .iter()
            .map(|hit| {
                serde_json::json!({
                    "chunk_id": hit.entry.chunk_id(),
                    "source": hit.entry.source,
                    "start_secs": hit.entry.start_secs,
                    "score": hit.score,
                    "flow_similarity": hit.flow_similarity,
                    "pattern_similarity": hit.pattern_similarity,
                    "waveform": hit.entry.record.waveform,
                })
            })
            .collect();
        return Ok(serde_json::Value::Array(rows).to_string());
    }

    if hits.is_empty() {
        return Ok("No matches".to_string());
    }
    let lines: Vec<String> = hits
        .iter()
        .enumerate()
        .map(|(rank, hit)| {
            format!(
                "{}. {} @ {:.1}s  score {:.3} (flow {:.3}, pattern {:.3})\n   {}",
                rank + 1,
                hit.entry.chunk_id(),
                hit.entry.start_secs,
                hit.score,
                hit.flow_similarity,
                hit.pattern_similarity,
                hit.entry.record.waveform,
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_split_on_whitespace_and_commas() {
        assert_eq!(parse_samples("1, 2\n3\t-4.5").unwrap(), vec![1.0, 2.0, 3.0, -4.5]);
        assert_eq!(parse_samples("").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn bad_samples_are_rejected() {
        assert!(matches!(parse_samples("1 x 3"), Err(Error::Usage(_))));
        assert!(matches!(parse_samples("1 NaN"), Err(Error::Sample(_))));
        assert!(matches!(parse_samples("inf"), Err(Error::Sample(_))));
    }

    #[test]
    fn grid_from_args() {
        let opts = Opts {
            command: Command::Heatmap,
            args: vec!["0 1".into(), "1,0".into()],
            ..Opts::default()
        };
        assert_eq!(read_grid(&opts).unwrap(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn compare_output() {
        let opts = Opts {
            command: Command::Compare,
            args: vec!["⠁⠃⠇".into(), "⠁⠃⠇".into()],
            ..Opts::default()
        };
        let out = compare(&opts).unwrap();
        assert_eq!(out, "Flow similarity:    1.000\nPattern similarity: 1.000");
    }

    #[test]
    fn flow_json_is_a_record() {
        let opts = Opts {
            command: Command::Flow,
            args: vec!["⠁⠃⠇".into()],
            json: true,
            ..Opts::default()
        };
        let record: FlowRecord = serde_json::from_str(&flow(&opts).unwrap()).unwrap();
        assert_eq!(record.flow_sequence, "↓↓");
    }

    #[test]
    fn missing_index_file_is_empty() {
        let path = std::env::temp_dir().join("octodot-cli-test-missing-index.json");
        let _ = fs::remove_file(&path);
        assert!(load_entries(&path).unwrap().is_empty());
    }
}
