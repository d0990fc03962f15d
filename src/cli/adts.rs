use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Result, bail};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::command::{AdtsArgs, Cli};
use crate::input::InputReader;
use mediasync::process::extract::AdtsExtractor;
use mediasync::structs::adts::ADTS_HEADER_LEN;

const CHUNK_SIZE: usize = 64 * 1024;

/// Samples per AAC frame with the long transform; used only for the
/// duration estimate in the summary.
const SAMPLES_PER_FRAME: usize = 1024;

pub fn cmd_adts(args: &AdtsArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Analyzing ADTS stream: {}", args.input.display());

    let mut input_reader = InputReader::new(&args.input)?;
    let mut extractor = AdtsExtractor::default();

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let pb = if let Some(multi) = multi {
        let pb = multi.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Analyzing frames...");
        Some(pb)
    } else {
        None
    };

    writeln!(sink, "-----+- ADTS Frame Table -+------+")?;
    writeln!(sink, " NUM | Profile | Frequency| Size |")?;
    writeln!(sink, "-----+---------+----------+------+")?;

    let mut frame_count = 0usize;
    let mut total_bytes = 0usize;
    let mut first_frequency: Option<u32> = None;

    input_reader.process_chunks(CHUNK_SIZE, |chunk| {
        total_bytes += chunk.len();
        extractor.push_bytes(chunk);

        for frame_result in extractor.by_ref() {
            let frame = match frame_result {
                Ok(frame) => frame,
                // Recoverable: the next chunk tops up the ring buffer.
                Err(_) => continue,
            };

            let header = &frame.header;
            let frequency = match header.sampling_frequency() {
                Some(frequency) => format!("{frequency}Hz"),
                None => "unknown".to_string(),
            };

            if first_frequency.is_none() {
                first_frequency = header.sampling_frequency();
            }

            let profile = header.profile().to_string();
            writeln!(
                sink,
                "{frame_count:5}| {profile:>8}| {frequency:>9}| {:5}|",
                header.frame_length
            )?;
            frame_count += 1;

            if frame_count.is_multiple_of(100) {
                if let Some(ref pb) = pb {
                    pb.set_message(format!("Analyzing frames...       {frame_count}"));
                    pb.tick();
                }
            }
        }

        Ok(true)
    })?;

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    sink.flush()?;

    let remnant = extractor.pending_bytes();
    if remnant > 0 && remnant < ADTS_HEADER_LEN {
        log::debug!("Discarding {remnant}-byte truncated partial frame at end of input");
    }

    if extractor.bytes_skipped() > 0 {
        if cli.strict {
            bail!(
                "{} bytes skipped while resynchronizing",
                extractor.bytes_skipped()
            );
        }
        log::warn!(
            "{} bytes skipped while resynchronizing",
            extractor.bytes_skipped()
        );
    }

    print_summary(frame_count, total_bytes, first_frequency);

    Ok(())
}

fn print_summary(frame_count: usize, total_bytes: usize, first_frequency: Option<u32>) {
    println!();
    println!("Analysis Summary");
    println!("  Frames processed          {frame_count}");

    let size_mb = total_bytes as f64 / 1_000_000.0;
    println!("  Size                      {size_mb:.2} MB ({total_bytes} bytes)");

    if let Some(frequency) = first_frequency {
        let total_samples = frame_count * SAMPLES_PER_FRAME;
        let duration_secs = total_samples as f64 / frequency as f64;
        println!("  Duration                  {}", time_str(duration_secs));

        if duration_secs > 0.0 {
            let avg_data_rate_kbps = (total_bytes as f64 * 8.0) / (duration_secs * 1000.0);
            println!("  Average data rate         {avg_data_rate_kbps:.1} kbps");
        }
    }

    println!();
}

fn time_str(sec: f64) -> String {
    let ms = sec * 1000f64;
    let hours = (ms / 3600000f64) as u64;
    let minutes = ((ms % 3600000f64) / 60000f64) as u64;
    let seconds = ((ms % 60000f64) / 1000f64) as u64;
    let milliseconds = (ms % 1000f64) as u64;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
}
