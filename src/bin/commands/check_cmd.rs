use anyhow::{Context, Result};
use blockscan::analysis::{attribute_lines, Detection, Report, RunOptions};
use blockscan::block::{load_blocks, load_denylist};
use blockscan::{MatcherKind, PhraseSet};
use std::io::{self, Write};
use std::path::PathBuf;
use termcolor::{Color, StandardStream};

use crate::cli_utils::{
    display_name, format_ms, format_number, stdout, write_colored, write_highlighted,
};

pub struct CheckArgs {
    pub denylist: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub matchers: String,
    pub format: String,
    pub parallel: bool,
    pub details: bool,
    pub no_color: bool,
}

pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let kinds = MatcherKind::parse_list(&args.matchers)?;
    if !matches!(args.format.as_str(), "table" | "json" | "csv") {
        anyhow::bail!(
            "Unknown format '{}' (expected table, json, or csv)",
            args.format
        );
    }
    let table = args.format == "table";

    let raw = load_denylist(&args.denylist)
        .with_context(|| format!("Failed to load denylist: {}", args.denylist.display()))?;
    let phrases = PhraseSet::new(&raw);
    if phrases.is_empty() {
        eprintln!("Warning: denylist has no usable phrases; nothing can match");
    }

    // Missing inputs are reported and skipped, as long as one remains
    let mut inputs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        if path.is_file() {
            inputs.push(path.clone());
        } else {
            eprintln!("Warning: input file not found: {}", path.display());
        }
    }
    if inputs.is_empty() {
        anyhow::bail!("No input files to check");
    }

    let blocks = load_blocks(&inputs).context("Failed to load input blocks")?;
    if table {
        println!("Denylist phrases: {}", format_number(phrases.len()));
        println!("Input files:      {}", inputs.len());
        println!("Blocks to check:  {}", format_number(blocks.len()));
    }

    let options = RunOptions {
        kinds,
        parallel: args.parallel,
    };
    let report = Report::generate(&phrases, &blocks, &options);

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "csv" => write_csv(&report, io::stdout().lock())?,
        _ => {
            print_table(&report);
            print_analysis(&report);
            if args.details {
                let mut out = stdout(args.no_color);
                print_details(&mut out, &report, &phrases)?;
            }
        }
    }

    Ok(())
}

fn print_table(report: &Report) {
    println!("\n=== Matcher comparison ===");
    println!("{}", "-".repeat(86));
    println!(
        "| {:<24} | {:>12} | {:>12} | {:>10} | {:>10} |",
        "Matcher", "Build (ms)", "Scan (ms)", "Blocks", "Found"
    );
    println!("{}", "-".repeat(86));
    for run in &report.runs {
        println!(
            "| {:<24} | {:>12} | {:>12} | {:>10} | {:>10} |",
            run.name,
            format_ms(run.build_time),
            format_ms(run.scan_time),
            format_number(run.total_blocks),
            format_number(run.found.len())
        );
    }
    println!("{}", "-".repeat(86));
}

fn print_analysis(report: &Report) {
    let comparison = &report.comparison;
    println!("\nAnalysis:");
    if !comparison.all_agree() {
        println!(
            "Blocks where matchers disagree: {}",
            comparison.disagreeing_blocks
        );
        for (count, blocks) in &comparison.disagreements_by_count {
            println!(
                "  flagged by {} of {} matchers: {} blocks",
                count, comparison.matcher_count, blocks
            );
        }
    } else if comparison.flagged_blocks > 0 {
        println!("All matchers flagged the same blocks.");
    } else {
        println!("No blocks flagged.");
    }
}

fn print_details(out: &mut StandardStream, report: &Report, phrases: &PhraseSet) -> Result<()> {
    writeln!(out, "\n=== Flagged blocks ===")?;
    writeln!(
        out,
        "Blocks containing denylisted phrases: {}",
        report.detections.len()
    )?;
    writeln!(out, "{}", "=".repeat(100))?;

    for detection in &report.detections {
        print_detection(out, detection, phrases, report.runs.len())?;
    }
    Ok(())
}

fn print_detection(
    out: &mut StandardStream,
    detection: &Detection,
    phrases: &PhraseSet,
    matcher_count: usize,
) -> Result<()> {
    writeln!(out, "\nFile: {}", display_name(&detection.source))?;
    writeln!(out, "Block #{}", detection.number)?;

    let mut names: Vec<&str> = detection.detected_by.iter().map(|k| k.as_str()).collect();
    names.sort_unstable();
    write_colored(
        out,
        Color::Cyan,
        &format!(
            "Detected by: {} ({} of {})",
            names.join(", "),
            detection.detection_count(),
            matcher_count
        ),
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(100))?;

    let mut hits = 0;
    for attribution in attribute_lines(detection, phrases) {
        write!(out, "  • ")?;
        match &attribution.phrase {
            Some(phrase) => {
                hits += 1;
                write_highlighted(out, &attribution.line, phrase)?;
            }
            None => writeln!(out, "{}", attribution.line)?,
        }
    }

    write_colored(
        out,
        Color::Yellow,
        &format!("\nDenylisted lines in this block: {}", hits),
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(100))?;
    Ok(())
}

fn write_csv<W: Write>(report: &Report, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["source", "block", "detected_by", "detection_count", "lines"])?;
    for detection in &report.detections {
        let number = detection.number.to_string();
        let detected_by: Vec<&str> = detection.detected_by.iter().map(|k| k.as_str()).collect();
        let detected_by = detected_by.join(";");
        let count = detection.detection_count().to_string();
        let lines = detection.lines.join(" | ");
        csv.write_record([
            detection.source.as_str(),
            number.as_str(),
            detected_by.as_str(),
            count.as_str(),
            lines.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}
