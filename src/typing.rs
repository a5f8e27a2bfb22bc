//! Typed-in reveal of AI replies
//!
//! Replies are shown one character at a time before being swapped for their
//! formatted HTML.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

/// Successive prefixes of `text`, each one character longer than the last.
///
/// Prefixes always end on a `char` boundary.
pub fn reveal_frames(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .map(move |(start, ch)| &text[..start + ch.len_utf8()])
}

/// Feed every reveal frame of `text` to `sink`, one per `delay`.
///
/// Returns the number of frames emitted. A zero delay emits all frames
/// without yielding to the timer.
pub async fn type_text<F>(text: &str, delay: Duration, mut sink: F) -> usize
where
    F: FnMut(&str),
{
    let mut frames = 0;

    if delay.is_zero() {
        for frame in reveal_frames(text) {
            sink(frame);
            frames += 1;
        }
        return frames;
    }

    let mut ticker = interval(delay);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately.
    ticker.tick().await;

    for frame in reveal_frames(text) {
        ticker.tick().await;
        sink(frame);
        frames += 1;
    }

    tracing::trace!("Typed {} frames", frames);
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_frames() {
        let frames: Vec<_> = reveal_frames("abc").collect();
        assert_eq!(frames, vec!["a", "ab", "abc"]);
    }

    #[test]
    fn test_reveal_frames_multibyte() {
        let frames: Vec<_> = reveal_frames("héy").collect();
        assert_eq!(frames, vec!["h", "hé", "héy"]);
        assert_eq!(reveal_frames("").count(), 0);
    }

    #[tokio::test]
    async fn test_type_text_without_delay() {
        let mut seen = Vec::new();
        let count = type_text("hi!", Duration::ZERO, |frame| seen.push(frame.to_string())).await;
        assert_eq!(count, 3);
        assert_eq!(seen, vec!["h", "hi", "hi!"]);
    }

    #[tokio::test]
    async fn test_type_text_with_delay_ends_on_full_text() {
        let mut last = String::new();
        let start = tokio::time::Instant::now();
        let count = type_text("done", Duration::from_millis(2), |frame| {
            last = frame.to_string()
        })
        .await;

        assert_eq!(count, 4);
        assert_eq!(last, "done");
        assert!(start.elapsed() >= Duration::from_millis(8));
    }
}
