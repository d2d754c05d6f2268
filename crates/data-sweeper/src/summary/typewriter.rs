//! Incremental ("typewriter") text emitter.
//!
//! A [`Typewriter`] turns a string into whitespace-delimited word tokens,
//! each followed by a single space, and a final `"\n"` token. The caller
//! is suspended for the configured delay between successive tokens.

use super::pacer::{Pacer, SleepPacer};
use crate::config::DEFAULT_TOKEN_DELAY_MS;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::Duration;

/// Default pause between tokens.
pub const DEFAULT_TOKEN_DELAY: Duration = Duration::from_millis(DEFAULT_TOKEN_DELAY_MS);

/// Restartable source of paced word tokens.
#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<String>,
    delay: Duration,
    pacer: Arc<dyn Pacer>,
}

impl Typewriter {
    /// Emitter that sleeps the current thread between tokens.
    pub fn new(text: &str, delay: Duration) -> Self {
        Self::with_pacer(text, delay, Arc::new(SleepPacer))
    }

    pub fn with_pacer(text: &str, delay: Duration, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
            delay,
            pacer,
        }
    }

    /// A fresh pass over the tokens.
    pub fn tokens(&self) -> Tokens {
        Tokens::new(self.words.clone(), self.delay, Arc::clone(&self.pacer))
    }

    /// Number of tokens a full pass yields, including the newline.
    pub fn token_count(&self) -> usize {
        self.words.len() + 1
    }
}

/// Shorthand for [`Typewriter::new`].
pub fn emit(text: &str, delay: Duration) -> Typewriter {
    Typewriter::new(text, delay)
}

impl IntoIterator for Typewriter {
    type Item = String;
    type IntoIter = Tokens;

    fn into_iter(self) -> Tokens {
        Tokens::new(self.words, self.delay, self.pacer)
    }
}

impl IntoIterator for &Typewriter {
    type Item = String;
    type IntoIter = Tokens;

    fn into_iter(self) -> Tokens {
        self.tokens()
    }
}

/// One pass over a typewriter's tokens.
#[derive(Debug)]
pub struct Tokens {
    words: std::vec::IntoIter<String>,
    delay: Duration,
    pacer: Arc<dyn Pacer>,
    started: bool,
    finished: bool,
}

impl Tokens {
    fn new(words: Vec<String>, delay: Duration, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            words: words.into_iter(),
            delay,
            pacer,
            started: false,
            finished: false,
        }
    }
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        if self.started {
            self.pacer.pause(self.delay);
        }

        match self.words.next() {
            Some(word) => {
                self.started = true;
                Some(format!("{} ", word))
            }
            None => {
                self.finished = true;
                Some("\n".to_string())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.finished {
            0
        } else {
            self.words.len() + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tokens {}

impl FusedIterator for Tokens {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::pacer::NoopPacer;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CountingPacer {
        pauses: Mutex<Vec<Duration>>,
    }

    impl Pacer for CountingPacer {
        fn pause(&self, duration: Duration) {
            if let Ok(mut pauses) = self.pauses.lock() {
                pauses.push(duration);
            }
        }
    }

    #[test]
    fn test_tokens_in_order() {
        let tokens: Vec<String> = emit("a b c", Duration::ZERO).into_iter().collect();
        assert_eq!(tokens, vec!["a ", "b ", "c ", "\n"]);
    }

    #[test]
    fn test_empty_text_yields_newline() {
        let tokens: Vec<String> = emit("", Duration::ZERO).into_iter().collect();
        assert_eq!(tokens, vec!["\n"]);
        let tokens: Vec<String> = emit("   \n\t ", Duration::ZERO).into_iter().collect();
        assert_eq!(tokens, vec!["\n"]);
    }

    #[test]
    fn test_whitespace_collapses() {
        let tokens: Vec<String> = emit("  one\n\ntwo\tthree  ", Duration::ZERO)
            .into_iter()
            .collect();
        assert_eq!(tokens, vec!["one ", "two ", "three ", "\n"]);
    }

    #[test]
    fn test_restartable() {
        let typewriter = Typewriter::with_pacer("x y", Duration::ZERO, Arc::new(NoopPacer));
        let first: Vec<String> = typewriter.tokens().collect();
        let second: Vec<String> = (&typewriter).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(typewriter.token_count(), 3);
    }

    #[test]
    fn test_pauses_between_tokens_only() {
        let pacer = Arc::new(CountingPacer::default());
        let delay = Duration::from_millis(7);
        let typewriter = Typewriter::with_pacer("a b c", delay, pacer.clone());

        let tokens: Vec<String> = typewriter.tokens().collect();
        assert_eq!(tokens.len(), 4);

        // one pause before each token except the first
        let pauses = pacer.pauses.lock().unwrap();
        assert_eq!(pauses.len(), 3);
        assert!(pauses.iter().all(|d| *d == delay));
    }

    #[test]
    fn test_no_pause_for_empty_text() {
        let pacer = Arc::new(CountingPacer::default());
        let _: Vec<String> = Typewriter::with_pacer("", Duration::from_millis(1), pacer.clone())
            .tokens()
            .collect();
        assert!(pacer.pauses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fused_and_exact_size() {
        let mut tokens = emit("a", Duration::ZERO).tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.next().as_deref(), Some("a "));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.next().as_deref(), Some("\n"));
        assert_eq!(tokens.next(), None);
        assert_eq!(tokens.next(), None);
    }
}
