//! The cancelable wait at the heart of every interval.
//!
//! Two independent events race: the countdown elapses naturally, or the
//! skip listener delivers a signal. The skip channel has capacity one
//! and delivery is non-blocking (`try_send`), so a signal arriving
//! after the interval already elapsed lands in a full or closed channel
//! and disappears; the loser of the race has no effect.
//!
//! The display tick only refreshes the time-remaining line. Completion
//! is governed by the remaining duration, counted down one tick at a
//! time, independent of display granularity.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How the interval ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalOutcome {
    /// The configured duration elapsed in full.
    Completed,
    /// The user skipped; no time is credited.
    Skipped,
}

/// Whole-minute display refresh, matching the timer's granularity.
const DISPLAY_TICK: Duration = Duration::from_secs(60);

/// Wait out `duration`, racing against a skip signal.
///
/// With `show_countdown` off there is no listener to race: the wait is
/// a plain sleep and always completes.
pub async fn countdown(
    duration: Duration,
    show_countdown: bool,
    skip: &mut mpsc::Receiver<()>,
) -> IntervalOutcome {
    if !show_countdown {
        tokio::time::sleep(duration).await;
        return IntervalOutcome::Completed;
    }

    let mut remaining = duration;
    let mut ticker = tokio::time::interval(DISPLAY_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately; consume it
    // so every awaited tick below represents one elapsed minute.
    ticker.tick().await;

    print_remaining(remaining);
    let mut skip_open = true;

    while remaining > Duration::ZERO {
        tokio::select! {
            signal = skip.recv(), if skip_open => match signal {
                Some(()) => {
                    println!("\r  ⏭  Session skipped!                                  ");
                    return IntervalOutcome::Skipped;
                }
                // Input closed (EOF): no skip is coming; wait out the
                // clock.
                None => skip_open = false,
            },
            _ = ticker.tick() => {
                remaining = remaining.saturating_sub(DISPLAY_TICK);
                if remaining > Duration::ZERO {
                    print_remaining(remaining);
                }
            }
        }
    }

    println!("\r  ✅ Time's up!                                        ");
    IntervalOutcome::Completed
}

fn print_remaining(remaining: Duration) {
    print!(
        "\r  Time remaining: {} minutes (press 's' + Enter to skip)   ",
        remaining.as_secs() / 60
    );
    let _ = std::io::stdout().flush();
}

/// Spawn the per-interval listener that turns an `s` line on stdin into
/// a skip signal.
///
/// Delivery is `try_send`: if the countdown already finished, the
/// channel is full or closed and the signal is silently dropped. EOF or
/// a read error ends the listener without signaling (the conservative
/// default is "no skip"). The caller aborts the task once the interval
/// is over.
pub fn spawn_skip_listener(tx: mpsc::Sender<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().eq_ignore_ascii_case("s") {
                let _ = tx.try_send(());
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_completes_when_duration_elapses() {
        let (_tx, mut rx) = mpsc::channel(1);
        let outcome = countdown(Duration::from_secs(120), true, &mut rx).await;
        assert_eq!(outcome, IntervalOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_signal_wins_the_race() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.try_send(()).unwrap();

        let outcome = countdown(Duration::from_secs(25 * 60), true, &mut rx).await;
        assert_eq!(outcome, IntervalOutcome::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_skip_signal_is_dropped() {
        let (tx, mut rx) = mpsc::channel(1);
        let outcome = countdown(Duration::from_secs(60), true, &mut rx).await;
        assert_eq!(outcome, IntervalOutcome::Completed);

        // The listener may still deliver after natural elapse; the
        // signal goes nowhere and the outcome stands.
        let _ = tx.try_send(());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_waits_out_the_clock() {
        let (tx, mut rx) = mpsc::channel(1);
        drop(tx);

        let outcome = countdown(Duration::from_secs(180), true, &mut rx).await;
        assert_eq!(outcome, IntervalOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_countdown_is_a_plain_sleep() {
        let (_tx, mut rx) = mpsc::channel(1);
        let before = tokio::time::Instant::now();
        let outcome = countdown(Duration::from_secs(300), false, &mut rx).await;
        assert_eq!(outcome, IntervalOutcome::Completed);
        assert_eq!(before.elapsed(), Duration::from_secs(300));
    }
}
