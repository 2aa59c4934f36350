use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that end a sentence. The terminator stays attached to the
/// preceding unit.
pub const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '…', '.', '!', '?'];

pub const DEFAULT_MIN_UNIT_LENGTH: usize = 7;

// Hiragana, katakana, CJK ideographs, ASCII and full-width letters/digits.
// Punctuation and whitespace do not count toward a unit's length.
static MEANINGFUL_CHAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "[\\x{3040}-\\x{309F}\
         \\x{30A0}-\\x{30FF}\
         \\x{4E00}-\\x{9FFF}\
         A-Za-z0-9\
         \\x{FF21}-\\x{FF3A}\\x{FF41}-\\x{FF5A}\
         \\x{FF10}-\\x{FF19}]",
    )
    .expect("meaningful character class compiles")
});

fn meaningful_len(text: &str) -> usize {
    MEANINGFUL_CHAR.find_iter(text).count()
}

/// Splits text into synthesizable units.
///
/// Pure and stateless between calls; the same input always yields the same
/// units.
#[derive(Debug, Clone)]
pub struct Segmenter {
    min_unit_length: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_UNIT_LENGTH)
    }
}

impl Segmenter {
    pub fn new(min_unit_length: usize) -> Self {
        Self { min_unit_length }
    }

    /// Split `text` on sentence terminators, then merge any unit with fewer
    /// than `min_unit_length` meaningful characters into the previous one.
    /// The first unit is kept standalone even when short.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let mut raw: Vec<String> = Vec::new();
        let mut current = String::new();
        for ch in trimmed.chars() {
            current.push(ch);
            if SENTENCE_TERMINATORS.contains(&ch) {
                raw.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            raw.push(current);
        }

        let mut units: Vec<String> = Vec::new();
        for sentence in raw {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            match units.last_mut() {
                Some(prev) if meaningful_len(sentence) < self.min_unit_length => {
                    prev.push_str(sentence);
                }
                _ => units.push(sentence.to_string()),
            }
        }
        units
    }
}

/// Accumulates streamed text chunks and emits units as sentence boundaries
/// arrive.
///
/// `push` returns units for everything up to the last terminator seen so far;
/// `flush` drains whatever partial sentence remains. Used by callers feeding
/// token streams where chunk boundaries do not line up with sentences.
#[derive(Debug, Clone)]
pub struct SegmentBuffer {
    segmenter: Segmenter,
    pending: String,
}

impl Default for SegmentBuffer {
    fn default() -> Self {
        Self::new(Segmenter::default())
    }
}

impl SegmentBuffer {
    pub fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            pending: String::new(),
        }
    }

    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);
        let Some(idx) = self.pending.rfind(|c| SENTENCE_TERMINATORS.contains(&c)) else {
            return Vec::new();
        };
        let boundary = idx
            + self.pending[idx..]
                .chars()
                .next()
                .expect("terminator at index")
                .len_utf8();
        let ready: String = self.pending.drain(..boundary).collect();
        self.segmenter.segment(&ready)
    }

    pub fn flush(&mut self) -> Vec<String> {
        let rest = std::mem::take(&mut self.pending);
        self.segmenter.segment(&rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_units() {
        let segmenter = Segmenter::default();
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.segment("   \n\t ").is_empty());
    }

    #[test]
    fn terminator_stays_attached() {
        let segmenter = Segmenter::new(1);
        let units = segmenter.segment("今日はいい天気ですね。明日も晴れるでしょう。");
        assert_eq!(
            units,
            vec!["今日はいい天気ですね。", "明日も晴れるでしょう。"]
        );
    }

    #[test]
    fn short_units_merge_into_previous() {
        let segmenter = Segmenter::new(7);
        // Each clause alone has five meaningful characters, under the
        // threshold, so the second merges into the first.
        let units = segmenter.segment("こんにちは。ありがとう。");
        assert_eq!(units, vec!["こんにちは。ありがとう。"]);
    }

    #[test]
    fn first_unit_is_never_dropped_even_when_short() {
        let segmenter = Segmenter::new(7);
        let units = segmenter.segment("はい。");
        assert_eq!(units, vec!["はい。"]);
    }

    #[test]
    fn merging_only_targets_the_previous_unit() {
        let segmenter = Segmenter::new(7);
        let units = segmenter.segment("今日はいい天気ですね。はい。明日も晴れるでしょう。");
        assert_eq!(
            units,
            vec!["今日はいい天気ですね。はい。", "明日も晴れるでしょう。"]
        );
    }

    #[test]
    fn ascii_sentences_split_on_ascii_terminators() {
        let segmenter = Segmenter::new(1);
        let units = segmenter.segment("Hello there. How are you? Fine!");
        assert_eq!(units, vec!["Hello there.", "How are you?", "Fine!"]);
    }

    #[test]
    fn punctuation_does_not_count_toward_unit_length() {
        // "Hi!" has two meaningful characters; "!?..." has zero.
        assert_eq!(meaningful_len("Hi!"), 2);
        assert_eq!(meaningful_len("!?…。"), 0);
        assert_eq!(meaningful_len("ＡＢＣ１２３"), 6);
    }

    #[test]
    fn text_without_terminator_is_one_unit() {
        let segmenter = Segmenter::default();
        let units = segmenter.segment("終端記号のない長いテキストです");
        assert_eq!(units, vec!["終端記号のない長いテキストです"]);
    }

    #[test]
    fn segmentation_is_idempotent() {
        let segmenter = Segmenter::new(7);
        for text in [
            "こんにちは。ありがとう。",
            "今日はいい天気ですね。はい。明日も晴れるでしょう。",
            "Hello there. How are you? Fine!",
        ] {
            let once = segmenter.segment(text);
            let rejoined: String = once.concat();
            let twice = segmenter.segment(&rejoined);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn buffer_holds_partial_sentences() {
        let mut buffer = SegmentBuffer::new(Segmenter::new(1));
        assert!(buffer.push("今日はいい").is_empty());
        let units = buffer.push("天気ですね。明日も");
        assert_eq!(units, vec!["今日はいい天気ですね。"]);
        let rest = buffer.flush();
        assert_eq!(rest, vec!["明日も"]);
    }

    #[test]
    fn buffer_emits_up_to_the_last_terminator() {
        let mut buffer = SegmentBuffer::new(Segmenter::new(1));
        let units = buffer.push("一つ目の文はこれです。二つ目の文はこれです。三つ");
        assert_eq!(
            units,
            vec!["一つ目の文はこれです。", "二つ目の文はこれです。"]
        );
        assert_eq!(buffer.flush(), vec!["三つ"]);
    }

    #[test]
    fn flush_on_empty_buffer_yields_nothing() {
        let mut buffer = SegmentBuffer::default();
        assert!(buffer.flush().is_empty());
    }
}
