use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic power-meter log in the SD-card TSV format.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file
    #[arg(default_value = "sample_meter_log.txt")]
    output: PathBuf,

    /// Number of one-minute readings to generate
    #[arg(long, default_value_t = 3 * 24 * 60)]
    minutes: u32,

    /// Seed for the noise generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

/// SplitMix64; deterministic per seed so generated logs are reproducible.
struct Noise(u64);

impl Noise {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Roughly normal jitter: sum of 12 uniforms, centred (Irwin-Hall).
    fn jitter(&mut self, spread: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.unit()).sum();
        (sum - 6.0) * spread
    }
}

// ---------------------------------------------------------------------------
// Calendar stepping
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Clock {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl Clock {
    fn advance_minute(&mut self) {
        self.minute += 1;
        if self.minute < 60 {
            return;
        }
        self.minute = 0;
        self.hour += 1;
        if self.hour < 24 {
            return;
        }
        self.hour = 0;
        self.day += 1;
        if self.day <= days_in_month(self.year, self.month) {
            return;
        }
        self.day = 1;
        self.month += 1;
        if self.month > 12 {
            self.month = 1;
            self.year += 1;
        }
    }

    /// `M/D/Y\tH:MM AM|PM`, the device's own clock format.
    fn log_fields(&self) -> String {
        let (hour12, marker) = match self.hour {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!(
            "{}/{}/{}\t{}:{:02} {}",
            self.month, self.day, self.year, hour12, self.minute, marker
        )
    }
}

/// Write the header and `minutes` one-minute readings starting at
/// 11/20/2017 12:00 AM.
fn write_log<W: Write>(mut out: W, minutes: u32, seed: u64) -> io::Result<()> {
    let mut noise = Noise(seed);
    writeln!(
        out,
        "Date\tTime\tActive Power\tComplex Power\tApparent Power\tTotal Power"
    )?;

    let mut clock = Clock {
        year: 2017,
        month: 11,
        day: 20,
        hour: 0,
        minute: 0,
    };
    for _ in 0..minutes {
        // Daily load curve peaking mid-afternoon.
        let minute_of_day = f64::from(clock.hour * 60 + clock.minute);
        let phase = (minute_of_day / 1440.0 - 0.375) * 2.0 * std::f64::consts::PI;
        let active = 450.0 + 200.0 * phase.sin() + noise.jitter(15.0);
        let reactive = 0.35 * active + noise.jitter(5.0);
        let apparent = (active * active + reactive * reactive).sqrt();
        let total = active + reactive + apparent;

        writeln!(
            out,
            "{}\t{active:.3}\t{reactive:.3}\t{apparent:.3}\t{total:.3}",
            clock.log_fields()
        )?;
        clock.advance_minute();
    }
    out.flush()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_log(BufWriter::new(file), args.minutes, args.seed)
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!("Wrote {} readings to {}", args.minutes, args.output.display());
    println!("Wrote {} readings to {}", args.minutes, args.output.display());
    Ok(())
}
