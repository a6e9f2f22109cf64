use crate::generator::profile::SweepGenerator;
use anyhow::Context;
use log::{debug, info};
use std::io::Write;
use std::time::Duration;
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};

/// Writes emulated sensor lines to `sink` until `limit` lines are sent or
/// Ctrl+C is received. Returns the number of lines written.
pub async fn stream_lines<W: Write>(
    sink: &mut W,
    generator: &mut SweepGenerator,
    limit: Option<usize>,
) -> anyhow::Result<usize> {
    let period = Duration::from_millis(generator.profile().line_interval_ms.max(1));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sent = 0usize;

    loop {
        if limit.is_some_and(|limit| sent >= limit) {
            break;
        }
        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("awaiting Ctrl+C to exit")?;
                info!("interrupted after {} lines", sent);
                break;
            }
            _ = ticker.tick() => {
                let line = generator.next_line();
                sink.write_all(line.as_bytes()).context("writing sensor line")?;
                sink.flush().context("flushing sensor line")?;
                debug!("sent {}", line.trim_end());
                sent += 1;
            }
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::SweepProfile;

    #[test]
    fn stream_stops_at_limit() {
        let profile = SweepProfile {
            line_interval_ms: 1,
            noise_cm: 0.0,
            ..Default::default()
        };
        let mut generator = SweepGenerator::new(profile);
        let mut sink = Vec::new();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let sent = runtime
            .block_on(stream_lines(&mut sink, &mut generator, Some(3)))
            .unwrap();

        assert_eq!(sent, 3);
        assert_eq!(String::from_utf8(sink).unwrap(), "0,-\n1,-\n2,-\n");
    }
}
