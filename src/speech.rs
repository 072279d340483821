//! Spoken step narration
//!
//! The actual voice lives behind `SpeechBackend`; `Narrator` only enforces
//! that a new line cuts off whatever is still being spoken.

/// Voice language for every utterance
pub const VOICE_LANGUAGE: &str = "en-US";
/// Speaking rate (platform scale, 0.5 = normal)
pub const VOICE_RATE: f32 = 0.45;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: &'static str,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: VOICE_LANGUAGE,
            rate: VOICE_RATE,
        }
    }
}

/// Platform speech synthesizer
pub trait SpeechBackend {
    fn is_speaking(&self) -> bool;
    fn begin(&mut self, utterance: Utterance);
    /// Stop immediately
    fn halt(&mut self);
}

pub struct Narrator<B> {
    backend: B,
}

impl<B: SpeechBackend> Narrator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Speak `text`, interrupting any utterance in progress
    pub fn speak(&mut self, text: &str) {
        if self.backend.is_speaking() {
            self.backend.halt();
        }
        self.backend.begin(Utterance::new(text));
    }

    /// Stop speaking; a no-op when already silent
    pub fn stop(&mut self) {
        if self.backend.is_speaking() {
            self.backend.halt();
        }
    }
}

/// Backend that writes utterances to the log (headless builds)
#[derive(Debug, Default)]
pub struct LogSpeech {
    current: Option<Utterance>,
    spoken: usize,
}

impl LogSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Utterance> {
        self.current.as_ref()
    }

    pub fn spoken(&self) -> usize {
        self.spoken
    }
}

impl SpeechBackend for LogSpeech {
    fn is_speaking(&self) -> bool {
        self.current.is_some()
    }

    fn begin(&mut self, utterance: Utterance) {
        log::info!("🔊 {}", utterance.text);
        self.spoken += 1;
        self.current = Some(utterance);
    }

    fn halt(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every backend call
    #[derive(Default)]
    struct Script {
        speaking: bool,
        calls: Vec<String>,
    }

    impl SpeechBackend for Script {
        fn is_speaking(&self) -> bool {
            self.speaking
        }

        fn begin(&mut self, utterance: Utterance) {
            assert_eq!(utterance.language, "en-US");
            self.calls.push(format!("begin:{}", utterance.text));
            self.speaking = true;
        }

        fn halt(&mut self) {
            self.calls.push("halt".into());
            self.speaking = false;
        }
    }

    #[test]
    fn test_speak_interrupts() {
        let mut narrator = Narrator::new(Script::default());
        narrator.speak("one");
        narrator.speak("two");
        assert_eq!(
            narrator.backend().calls,
            vec!["begin:one", "halt", "begin:two"]
        );
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut narrator = Narrator::new(Script::default());
        narrator.stop();
        narrator.speak("hello");
        narrator.stop();
        narrator.stop();
        assert_eq!(narrator.backend().calls, vec!["begin:hello", "halt"]);
    }

    #[test]
    fn test_log_backend_tracks_current() {
        let mut narrator = Narrator::new(LogSpeech::new());
        narrator.speak("Next step. Stir.");
        assert_eq!(
            narrator.backend().current().map(|u| u.text.as_str()),
            Some("Next step. Stir.")
        );
        narrator.stop();
        assert!(narrator.backend().current().is_none());
        assert_eq!(narrator.backend().spoken(), 1);
    }
}
