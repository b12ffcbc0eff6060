//! Frames passed from the relay to the browser, one JSON object per line.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFrame {
    Delta { content: String },
    Error { message: String },
    Done,
}

impl StreamFrame {
    /// Serialize as a single NDJSON line, trailing newline included.
    pub fn to_line(&self) -> String {
        // A derived Serialize over Strings cannot fail.
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"type":"done"}"#));
        line.push('\n');
        line
    }
}

/// Reassembles lines from arbitrarily split network reads.
#[derive(Default, Debug)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one read; returns every line it completed, blank lines dropped.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        lines
    }

    /// Whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let rest = rest.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

/// Feeds decoded frames from a byte stream, buffering UTF-8 sequences that
/// straddle a read boundary.
#[derive(Default, Debug)]
pub struct FrameDecoder {
    lines: LineBuffer,
    carry: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<StreamFrame> {
        self.carry.extend_from_slice(bytes);
        let valid_up_to = match std::str::from_utf8(&self.carry) {
            Ok(_) => self.carry.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            // Truly invalid bytes: decode lossily rather than stall forever.
            Err(_) => {
                let text = String::from_utf8_lossy(&self.carry).into_owned();
                self.carry.clear();
                return decode_lines(self.lines.push(&text));
            }
        };

        let rest = self.carry.split_off(valid_up_to);
        let text = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry = rest;
        decode_lines(self.lines.push(&text))
    }

    pub fn finish(&mut self) -> Vec<StreamFrame> {
        let tail = String::from_utf8_lossy(&std::mem::take(&mut self.carry)).into_owned();
        let mut lines = self.lines.push(&tail);
        lines.extend(self.lines.finish());
        decode_lines(lines)
    }
}

fn decode_lines(lines: Vec<String>) -> Vec<StreamFrame> {
    lines
        .into_iter()
        .filter_map(|line| match serde_json::from_str::<StreamFrame>(&line) {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("dropping malformed frame {line:?}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_tagged_lines() {
        assert_eq!(
            StreamFrame::Delta { content: "a\nb".into() }.to_line(),
            "{\"type\":\"delta\",\"content\":\"a\\nb\"}\n"
        );
        assert_eq!(StreamFrame::Done.to_line(), "{\"type\":\"done\"}\n");
    }

    #[test]
    fn line_split_across_reads() {
        let mut buf = LineBuffer::new();
        assert!(buf.push("{\"a\":").is_empty());
        assert_eq!(buf.push("1}\n{\"b\""), vec!["{\"a\":1}"]);
        assert_eq!(buf.push(":2}\n"), vec!["{\"b\":2}"]);
        assert_eq!(buf.finish(), None);
    }

    #[test]
    fn many_lines_in_one_read() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push("x\n\ny\r\nz"), vec!["x", "y"]);
        assert_eq!(buf.finish().as_deref(), Some("z"));
    }

    #[test]
    fn decoder_yields_frames_in_order() {
        let mut decoder = FrameDecoder::new();
        let body = [
            StreamFrame::Delta { content: "Hel".into() }.to_line(),
            StreamFrame::Delta { content: "lo".into() }.to_line(),
            StreamFrame::Done.to_line(),
        ]
        .concat();
        let (a, b) = body.as_bytes().split_at(10);

        let mut frames = decoder.push_bytes(a);
        frames.extend(decoder.push_bytes(b));
        frames.extend(decoder.finish());

        assert_eq!(
            frames,
            vec![
                StreamFrame::Delta { content: "Hel".into() },
                StreamFrame::Delta { content: "lo".into() },
                StreamFrame::Done,
            ]
        );
    }

    #[test]
    fn decoder_keeps_multibyte_chars_whole() {
        let line = StreamFrame::Delta { content: "héllo 🦀".into() }.to_line();
        let bytes = line.as_bytes();
        let crab = line.find('🦀').unwrap();

        let mut decoder = FrameDecoder::new();
        let mut frames = decoder.push_bytes(&bytes[..crab + 2]);
        frames.extend(decoder.push_bytes(&bytes[crab + 2..]));

        assert_eq!(frames, vec![StreamFrame::Delta { content: "héllo 🦀".into() }]);
    }

    #[test]
    fn decoder_skips_garbage_lines() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push_bytes(b"not json\n{\"type\":\"done\"}\n");
        assert_eq!(frames, vec![StreamFrame::Done]);
    }

    #[test]
    fn decoder_flushes_unterminated_tail() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push_bytes(br#"{"type":"error","message":"x"}"#).is_empty());
        assert_eq!(decoder.finish(), vec![StreamFrame::Error { message: "x".into() }]);
    }
}
